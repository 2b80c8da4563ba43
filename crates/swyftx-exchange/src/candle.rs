//! OHLCV 캔들 정규화.
//!
//! 업스트림이 이미 이산 봉을 반환하므로 집계/리샘플링 없이
//! 필드 투영과 타입 강제만 수행합니다.

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use swyftx_core::{deserialize_flexible_decimal, Candle, Symbol, Timeframe};

use crate::error::ExchangeError;
use crate::traits::ExchangeResult;

/// 차트 API의 캔들 레코드.
///
/// 숫자 필드는 문자열("4261.48")과 숫자(10015) 표현이 혼용됩니다.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCandle {
    /// 봉 시작 시각 (epoch 밀리초)
    pub time: i64,
    #[serde(deserialize_with = "deserialize_flexible_decimal")]
    pub open: Decimal,
    #[serde(deserialize_with = "deserialize_flexible_decimal")]
    pub high: Decimal,
    #[serde(deserialize_with = "deserialize_flexible_decimal")]
    pub low: Decimal,
    #[serde(deserialize_with = "deserialize_flexible_decimal")]
    pub close: Decimal,
    #[serde(deserialize_with = "deserialize_flexible_decimal")]
    pub volume: Decimal,
}

/// 캔들 레코드 하나를 정규화합니다.
///
/// # Errors
/// 타임스탬프가 표현 범위를 벗어나면 `ParseError`를 반환합니다.
pub fn parse_candle(
    raw: &RawCandle,
    symbol: &Symbol,
    timeframe: Timeframe,
) -> ExchangeResult<Candle> {
    let open_time = DateTime::from_timestamp_millis(raw.time).ok_or_else(|| {
        ExchangeError::ParseError(format!("candle timestamp out of range: {}", raw.time))
    })?;

    Ok(Candle {
        symbol: symbol.to_standard_string(),
        timeframe,
        open_time,
        open: raw.open,
        high: raw.high,
        low: raw.low,
        close: raw.close,
        volume: raw.volume,
    })
}
