use crate::engine::types::CastlingRule;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "chess_rules=info";

/// Rules configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct RulesConfig {
    /// How strictly castling is checked (`CHESS_CASTLING`).
    pub castling: CastlingRule,
    /// Position new games start from instead of the standard one
    /// (`CHESS_START_FEN`).
    pub start_fen: Option<String>,
    /// Tracing filter used when `RUST_LOG` is unset (`CHESS_LOG`).
    pub log_filter: String,
}

impl RulesConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        RulesConfig {
            castling: std::env::var("CHESS_CASTLING")
                .ok()
                .and_then(|v| CastlingRule::from_str_loose(&v))
                .unwrap_or_default(),
            start_fen: std::env::var("CHESS_START_FEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            log_filter: std::env::var("CHESS_LOG")
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            castling: CastlingRule::Permissive,
            start_fen: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GameState;

    #[test]
    fn default_config() {
        let config = RulesConfig::default();
        assert_eq!(config.castling, CastlingRule::Permissive);
        assert_eq!(config.start_fen, None);
        assert_eq!(config.log_filter, "chess_rules=info");
    }

    #[test]
    fn from_env_defaults() {
        // Without setting env vars, should fall back to defaults
        let config = RulesConfig::from_env();
        assert_eq!(config.castling, CastlingRule::Permissive);
        assert_eq!(config.start_fen, None);
    }

    #[test]
    fn config_drives_game_setup() {
        let config = RulesConfig {
            castling: CastlingRule::Strict,
            start_fen: Some("4k3/8/8/8/8/8/8/4K2R w K - 0 1".to_string()),
            ..RulesConfig::default()
        };
        let game = GameState::from_config(&config).unwrap();
        assert_eq!(game.castling_rule(), CastlingRule::Strict);
        assert_eq!(game.to_fen(), "4k3/8/8/8/8/8/8/4K2R w K - 0 1");

        let bad = RulesConfig {
            start_fen: Some("not a fen".to_string()),
            ..RulesConfig::default()
        };
        assert!(GameState::from_config(&bad).is_err());
    }
}
