use serde::{Deserialize, Serialize};
use std::fmt;

/// 试卷套别（A/B/C/D 卷）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SetName {
    A,
    B,
    C,
    D,
}

impl SetName {
    /// 全部套别，按导出顺序排列
    pub const ALL: [SetName; 4] = [SetName::A, SetName::B, SetName::C, SetName::D];

    /// 获取套别字母
    pub fn name(self) -> &'static str {
        match self {
            SetName::A => "A",
            SetName::B => "B",
            SetName::C => "C",
            SetName::D => "D",
        }
    }

    /// 尝试从字符串解析套别（忽略大小写和 "Set " 前缀）
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s
            .strip_prefix("Set ")
            .or_else(|| s.strip_prefix("set "))
            .unwrap_or(s)
            .trim();
        match s {
            "A" | "a" => Some(SetName::A),
            "B" | "b" => Some(SetName::B),
            "C" | "c" => Some(SetName::C),
            "D" | "d" => Some(SetName::D),
            _ => None,
        }
    }
}

impl fmt::Display for SetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(SetName::from_str("A"), Some(SetName::A));
        assert_eq!(SetName::from_str(" d "), Some(SetName::D));
        assert_eq!(SetName::from_str("Set B"), Some(SetName::B));
        assert_eq!(SetName::from_str("E"), None);
        assert_eq!(SetName::from_str(""), None);
    }

    #[test]
    fn test_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&SetName::C).unwrap(), "\"C\"");
        let parsed: SetName = serde_json::from_str("\"B\"").unwrap();
        assert_eq!(parsed, SetName::B);
    }
}
