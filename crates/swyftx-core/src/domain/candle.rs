//! 캔들스틱(OHLCV) 구조체.

use crate::types::{Price, Quantity, Timeframe};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 정규화된 OHLCV 캔들.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// 심볼 문자열 (예: "BTC/AUD")
    pub symbol: String,
    /// 타임프레임
    pub timeframe: Timeframe,
    /// 봉 시작 시각
    pub open_time: DateTime<Utc>,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량
    pub volume: Quantity,
}

impl Candle {
    /// 봉 시작 시각을 epoch 밀리초로 반환합니다.
    pub fn open_time_millis(&self) -> i64 {
        self.open_time.timestamp_millis()
    }

    /// 양봉인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_candle_millis() {
        let candle = Candle {
            symbol: "BTC/AUD".to_string(),
            timeframe: Timeframe::D1,
            open_time: DateTime::from_timestamp_millis(1501545600000).unwrap(),
            open: dec!(4261.48),
            high: dec!(4745.42),
            low: dec!(3400.00),
            close: dec!(4724.89),
            volume: dec!(10015),
        };

        assert_eq!(candle.open_time_millis(), 1501545600000);
        assert!(candle.is_bullish());
    }
}
