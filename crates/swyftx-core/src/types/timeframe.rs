//! 캔들스틱 데이터를 위한 타임프레임 정의.
//!
//! Swyftx 차트 API가 지원하는 해상도만 정의합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// 캔들스틱 타임프레임.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// 1분봉
    M1,
    /// 5분봉
    M5,
    /// 1시간봉
    H1,
    /// 4시간봉
    H4,
    /// 일봉
    D1,
}

impl Timeframe {
    /// 이 타임프레임의 기간을 반환합니다.
    pub fn duration(&self) -> Duration {
        match self {
            Timeframe::M1 => Duration::from_secs(60),
            Timeframe::M5 => Duration::from_secs(5 * 60),
            Timeframe::H1 => Duration::from_secs(60 * 60),
            Timeframe::H4 => Duration::from_secs(4 * 60 * 60),
            Timeframe::D1 => Duration::from_secs(24 * 60 * 60),
        }
    }

    /// 차트 API의 resolution 쿼리 값으로 변환합니다.
    pub fn to_resolution(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M5 => "5m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
            Timeframe::D1 => "1d",
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Timeframe::M1),
            "5m" => Ok(Timeframe::M5),
            "1h" => Ok(Timeframe::H1),
            "4h" => Ok(Timeframe::H4),
            "1d" => Ok(Timeframe::D1),
            _ => Err(format!("Unknown timeframe: {}", s)),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_resolution())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_round_trip() {
        for tf in [
            Timeframe::M1,
            Timeframe::M5,
            Timeframe::H1,
            Timeframe::H4,
            Timeframe::D1,
        ] {
            assert_eq!(tf.to_resolution().parse::<Timeframe>().unwrap(), tf);
        }
    }

    #[test]
    fn test_unknown_resolution() {
        assert!("3m".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_duration() {
        assert_eq!(Timeframe::H4.duration().as_secs(), 4 * 3600);
    }
}
