//! Swyftx REST 클라이언트.
//!
//! 서명기가 만든 요청 기술자를 실행하고 응답을 정규화 엔티티로
//! 변환합니다. 재시도와 rate limiting은 상위 계층의 책임입니다.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, Method};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use swyftx_core::{
    deserialize_flexible_decimal, deserialize_flexible_decimal_opt, Candle, Market, Order,
    OrderRequest, Symbol, Timeframe,
};

use crate::auth::SessionManager;
use crate::candle::{parse_candle, RawCandle};
use crate::config::SwyftxConfig;
use crate::error::ExchangeError;
use crate::market::{parse_markets, RawAsset, SETTLEMENT_CURRENCY};
use crate::order::{build_create_order_request, parse_order, RawOrderResponse};
use crate::signer::{AccessLevel, RequestSigner, SignedRequest};
use crate::traits::{AssetTransfer, Balance, Exchange, ExchangeResult, WithdrawalLimits};

/// 차트 봉의 호가 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RateSide {
    /// 매도 호가 기준 (가격 차트의 관례적 기준)
    #[default]
    Ask,
    /// 매수 호가 기준
    Bid,
}

impl RateSide {
    fn as_path_segment(&self) -> &'static str {
        match self {
            RateSide::Ask => "ask",
            RateSide::Bid => "bid",
        }
    }
}

/// `GET /user/balance/`의 잔고 레코드.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBalance {
    asset_id: i64,
    #[serde(deserialize_with = "deserialize_flexible_decimal")]
    available_balance: Decimal,
}

/// `GET /live-rates/{asset}/`의 호가 레코드.
///
/// 응답은 자산 ID를 키로 하는 맵이며, 값은 기준 자산으로 표시된
/// 호가입니다.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveRate {
    /// 매수 호가
    #[serde(default, deserialize_with = "deserialize_flexible_decimal_opt")]
    pub bid_price: Option<Decimal>,
    /// 매도 호가
    #[serde(default, deserialize_with = "deserialize_flexible_decimal_opt")]
    pub ask_price: Option<Decimal>,
    /// 중간 가격
    #[serde(default, deserialize_with = "deserialize_flexible_decimal_opt")]
    pub mid_price: Option<Decimal>,
}

/// Swyftx 거래소 클라이언트.
pub struct SwyftxClient {
    config: SwyftxConfig,
    client: Client,
    session: SessionManager,
    signer: RequestSigner,
}

impl SwyftxClient {
    /// 새 클라이언트 생성.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `ExchangeError::NetworkError`를 반환합니다.
    pub fn new(config: SwyftxConfig) -> ExchangeResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ExchangeError::NetworkError(format!("failed to build HTTP client: {}", e))
            })?;

        let session = SessionManager::new(config.clone(), client.clone());
        let signer = RequestSigner::new(config.base_url());

        Ok(Self {
            config,
            client,
            session,
            signer,
        })
    }

    /// 환경 변수에서 생성.
    ///
    /// 환경 변수가 설정되지 않았거나 클라이언트 생성에 실패하면 `None`을 반환합니다.
    pub fn from_env() -> Option<Self> {
        SwyftxConfig::from_env().and_then(|config| Self::new(config).ok())
    }

    /// 세션 관리자 반환.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// 서명된 요청 기술자를 전송합니다.
    async fn send(&self, signed: SignedRequest) -> ExchangeResult<reqwest::Response> {
        debug!("{} {}", signed.method, signed.url);

        let mut builder = self
            .client
            .request(signed.method, &signed.url)
            .headers(signed.headers);
        if let Some(body) = signed.body {
            builder = builder.body(body);
        }

        builder
            .send()
            .await
            .map_err(|e| ExchangeError::NetworkError(e.to_string()))
    }

    /// 서명된 요청 기술자를 실행하고 응답을 역직렬화합니다.
    async fn execute<T: for<'de> Deserialize<'de>>(
        &self,
        signed: SignedRequest,
    ) -> ExchangeResult<T> {
        let response = self.send(signed).await?;
        self.handle_response(response).await
    }

    /// 서명 후 실행하는 단축 경로.
    async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        access: AccessLevel,
        method: Method,
        params: Map<String, Value>,
    ) -> ExchangeResult<T> {
        let signed = self
            .signer
            .sign(path, access, method, params, &self.session)
            .await?;
        self.execute(signed).await
    }

    /// 응답 본문을 해석하지 않는 요청 실행 (성공 상태만 확인).
    ///
    /// 취소처럼 본문이 비어 있을 수 있는 작업에 사용합니다.
    async fn request_unit(
        &self,
        path: &str,
        access: AccessLevel,
        method: Method,
        params: Map<String, Value>,
    ) -> ExchangeResult<()> {
        let signed = self
            .signer
            .sign(path, access, method, params, &self.session)
            .await?;
        let response = self.send(signed).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::NetworkError(e.to_string()))?;
        Err(ExchangeError::from_status(status, &body))
    }

    /// API 응답 처리.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> ExchangeResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::NetworkError(e.to_string()))?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| {
                error!("Failed to parse response: {} - Body: {}", e, body);
                ExchangeError::ParseError(e.to_string())
            })
        } else {
            Err(ExchangeError::from_status(status, &body))
        }
    }

    // === 시장 데이터 ===

    /// 거래 가능한 마켓 목록 조회.
    ///
    /// 결제 통화(AUD) 레코드는 제외되며 업스트림 순서가 보존됩니다.
    pub async fn fetch_markets(&self) -> ExchangeResult<Vec<Market>> {
        let assets: Vec<RawAsset> = self
            .request(
                "markets/assets/",
                AccessLevel::Public,
                Method::GET,
                Map::new(),
            )
            .await?;

        let markets = parse_markets(assets, &self.config);
        info!("Fetched {} markets", markets.len());
        Ok(markets)
    }

    /// 과거 캔들스틱 조회.
    ///
    /// `since`/`until`은 epoch 밀리초 기준 시작/종료 시각입니다.
    pub async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        side: RateSide,
        since: Option<i64>,
        until: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Candle>> {
        let path = format!(
            "charts/getBars/{}/{}/{}/",
            SETTLEMENT_CURRENCY,
            symbol.base,
            side.as_path_segment()
        );

        let mut params = Map::new();
        params.insert(
            "resolution".to_string(),
            Value::from(timeframe.to_resolution()),
        );
        if let Some(start) = since {
            params.insert("timeStart".to_string(), Value::from(start));
        }
        if let Some(end) = until {
            params.insert("timeEnd".to_string(), Value::from(end));
        }
        if let Some(limit) = limit {
            params.insert("limit".to_string(), Value::from(limit));
        }

        let raw: Vec<RawCandle> = self
            .request(&path, AccessLevel::Public, Method::GET, params)
            .await?;

        raw.iter()
            .map(|candle| parse_candle(candle, symbol, timeframe))
            .collect()
    }

    /// 자산 기준 실시간 호가 조회.
    ///
    /// 반환 맵의 키는 거래소 자산 ID입니다.
    pub async fn fetch_live_rates(
        &self,
        denomination: &str,
    ) -> ExchangeResult<HashMap<String, LiveRate>> {
        let path = format!("live-rates/{}/", denomination.to_uppercase());
        self.request(&path, AccessLevel::Public, Method::GET, Map::new())
            .await
    }

    /// 마켓 하나의 현재 호가 조회.
    ///
    /// 호가 통화 기준 실시간 호가 맵에서 해당 자산의 항목을 선택합니다.
    ///
    /// # Errors
    /// 호가 맵에 자산 항목이 없으면 `SymbolNotFound`를 반환합니다.
    pub async fn fetch_ticker(&self, market: &Market) -> ExchangeResult<LiveRate> {
        let rates = self.fetch_live_rates(market.quote()).await?;
        rates
            .get(&market.exchange_id)
            .cloned()
            .ok_or_else(|| ExchangeError::SymbolNotFound(market.symbol.to_string()))
    }

    // === 계좌 작업 ===

    /// 계좌 잔고 조회.
    pub async fn fetch_balance(&self) -> ExchangeResult<Vec<Balance>> {
        let raw: Vec<RawBalance> = self
            .request(
                "user/balance/",
                AccessLevel::Private,
                Method::GET,
                Map::new(),
            )
            .await?;

        Ok(raw
            .into_iter()
            .map(|b| Balance {
                asset: b.asset_id.to_string(),
                available: b.available_balance,
            })
            .collect())
    }

    /// 출금 한도 조회.
    pub async fn fetch_withdrawal_limits(&self) -> ExchangeResult<WithdrawalLimits> {
        self.request(
            "limits/withdrawal/",
            AccessLevel::Private,
            Method::GET,
            Map::new(),
        )
        .await
    }

    /// 입금 이력 조회.
    pub async fn fetch_deposit_history(
        &self,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> ExchangeResult<Vec<AssetTransfer>> {
        self.fetch_transfer_history("history/deposit/", limit, page)
            .await
    }

    /// 출금 이력 조회.
    pub async fn fetch_withdrawal_history(
        &self,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> ExchangeResult<Vec<AssetTransfer>> {
        self.fetch_transfer_history("history/withdraw/", limit, page)
            .await
    }

    async fn fetch_transfer_history(
        &self,
        path: &str,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> ExchangeResult<Vec<AssetTransfer>> {
        let mut params = Map::new();
        if let Some(limit) = limit {
            params.insert("limit".to_string(), Value::from(limit));
        }
        if let Some(page) = page {
            params.insert("page".to_string(), Value::from(page));
        }

        self.request(path, AccessLevel::Private, Method::GET, params)
            .await
    }

    // === 주문 작업 ===

    /// 새 주문 제출.
    pub async fn create_order(
        &self,
        request: &OrderRequest,
        market: &Market,
    ) -> ExchangeResult<Order> {
        let body = build_create_order_request(request, market)?;
        let params = order_body_params(&body)?;

        info!(
            "Placing {} {} order for {} {}",
            request.side, request.kind, request.amount, market.symbol
        );

        let raw: RawOrderResponse = self
            .request("orders/", AccessLevel::Private, Method::POST, params)
            .await?;

        info!("Order placed successfully: {}", raw.order_uuid);
        parse_order(&raw, market)
    }

    /// 기존 주문 수정.
    pub async fn amend_order(
        &self,
        order_uuid: &str,
        request: &OrderRequest,
        market: &Market,
    ) -> ExchangeResult<Order> {
        let body = build_create_order_request(request, market)?;
        let mut params = order_body_params(&body)?;
        params.insert("orderUuid".to_string(), Value::from(order_uuid));

        let raw: RawOrderResponse = self
            .request("orders/", AccessLevel::Private, Method::PUT, params)
            .await?;

        info!("Order {} amended", order_uuid);
        parse_order(&raw, market)
    }

    /// 주문 취소.
    ///
    /// 취소 성공 응답의 본문은 비어 있을 수 있으므로 해석하지 않습니다.
    pub async fn cancel_order(&self, order_uuid: &str) -> ExchangeResult<()> {
        let path = format!("orders/{}/", order_uuid);
        self.request_unit(&path, AccessLevel::Private, Method::DELETE, Map::new())
            .await?;

        info!("Order {} cancelled", order_uuid);
        Ok(())
    }

    /// 주문 ID로 단일 주문 조회.
    pub async fn fetch_order(&self, order_uuid: &str, market: &Market) -> ExchangeResult<Order> {
        let path = format!("orders/byId/{}", order_uuid);
        let raw: RawOrderResponse = self
            .request(&path, AccessLevel::Private, Method::GET, Map::new())
            .await?;

        parse_order(&raw, market)
    }

    /// 자산별 주문 목록 조회.
    pub async fn fetch_orders(
        &self,
        market: &Market,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> ExchangeResult<Vec<Order>> {
        let path = format!("orders/{}", market.base());

        let mut params = Map::new();
        if let Some(limit) = limit {
            params.insert("limit".to_string(), Value::from(limit));
        }
        if let Some(page) = page {
            params.insert("page".to_string(), Value::from(page));
        }

        let raw: Vec<RawOrderResponse> = self
            .request(&path, AccessLevel::Private, Method::GET, params)
            .await?;

        raw.iter().map(|order| parse_order(order, market)).collect()
    }

    // === 세션 ===

    /// 세션을 로그아웃하고 로컬 토큰을 비웁니다.
    pub async fn logout(&self) -> ExchangeResult<()> {
        self.session.logout().await
    }
}

#[async_trait]
impl Exchange for SwyftxClient {
    async fn fetch_markets(&self) -> ExchangeResult<Vec<Market>> {
        SwyftxClient::fetch_markets(self).await
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        since: Option<i64>,
        until: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Candle>> {
        SwyftxClient::fetch_ohlcv(self, symbol, timeframe, RateSide::Ask, since, until, limit)
            .await
    }

    async fn fetch_balance(&self) -> ExchangeResult<Vec<Balance>> {
        SwyftxClient::fetch_balance(self).await
    }

    async fn create_order(
        &self,
        request: &OrderRequest,
        market: &Market,
    ) -> ExchangeResult<Order> {
        SwyftxClient::create_order(self, request, market).await
    }

    async fn cancel_order(&self, order_id: &str) -> ExchangeResult<()> {
        SwyftxClient::cancel_order(self, order_id).await
    }

    fn exchange_name(&self) -> &str {
        "Swyftx"
    }
}

/// 주문 본문을 서명기에 넘길 파라미터 맵으로 변환합니다.
fn order_body_params(body: &crate::order::CreateOrderBody) -> ExchangeResult<Map<String, Value>> {
    match serde_json::to_value(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(ExchangeError::ParseError(
            "order body did not serialize to an object".to_string(),
        )),
    }
}
