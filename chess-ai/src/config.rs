//! AI 配置

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    /// 简单：depth=1
    Easy,
    /// 中等：depth=2
    Medium,
    /// 困难：depth=3
    #[default]
    Hard,
    /// 专家：depth=4
    Expert,
}

impl Difficulty {
    /// 对应的搜索深度
    pub fn depth(&self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
            Difficulty::Expert => 4,
        }
    }
}

/// AI 配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    pub max_depth: u8,
    /// 同分走法随机选择的种子；`None` 时使用系统熵
    pub seed: Option<u64>,
}

/// JSON 中 `max_depth` 与 `seed` 可以省略
#[derive(Deserialize)]
struct RawAiConfig {
    #[serde(default)]
    difficulty: Difficulty,
    max_depth: Option<u8>,
    seed: Option<u64>,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            max_depth: difficulty.depth(),
            seed: None,
        }
    }

    /// 固定随机种子，使同分走法的选择可复现
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 从 JSON 加载配置
    ///
    /// ```json
    /// { "difficulty": "Expert", "seed": 7 }
    /// ```
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let raw: RawAiConfig = serde_json::from_str(text)?;
        let config = Self {
            difficulty: raw.difficulty,
            max_depth: raw.max_depth.unwrap_or(raw.difficulty.depth()),
            seed: raw.seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// 转换为 JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidDepth(self.max_depth));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::default())
    }
}
