use serde::{Deserialize, Serialize};

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Whether cheat commands are accepted.
    ///
    /// Cheats are a development tool; hosts running competitive matches
    /// disable them and the command loop rejects `Command::Cheat` with a
    /// structured error.
    pub cheats_enabled: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Development default; competitive hosts flip this off
            cheats_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert!(config.cheats_enabled);
    }
}
