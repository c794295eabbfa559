//! Signed account and order endpoints.

use crate::error::PoloniexError;
use crate::rest::PoloniexRestClient;
use crate::rest::endpoints::private;
use crate::rest::types::{
    AccountBalance, CancelOrderResponse, FeeInfo, OpenOrdersRequest, Order, OrderHistoryRequest,
    PlaceOrderRequest, PlaceOrderResponse,
};

impl PoloniexRestClient {
    // ========== Account ==========

    /// Get balances of every account.
    pub async fn get_account_balances(&self) -> Result<Vec<AccountBalance>, PoloniexError> {
        self.private_get::<_, ()>(private::BALANCES, None).await
    }

    /// Get balances of one account.
    pub async fn get_account_balance(&self, account_id: &str) -> Result<AccountBalance, PoloniexError> {
        let accounts: Vec<AccountBalance> = self
            .private_get::<_, ()>(&private::account_balances(account_id), None)
            .await?;
        accounts.into_iter().next().ok_or_else(|| {
            PoloniexError::InvalidResponse(format!("No balances returned for account {account_id}"))
        })
    }

    /// Get the account's fee rates and 30 day volume.
    pub async fn get_fee_info(&self) -> Result<FeeInfo, PoloniexError> {
        self.private_get::<_, ()>(private::FEE_INFO, None).await
    }

    // ========== Orders ==========

    /// Place a new order.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use poloniex_api_client::auth::Credentials;
    /// use poloniex_api_client::rest::{PlaceOrderRequest, PoloniexRestClient};
    /// use poloniex_api_client::Side;
    /// use std::sync::Arc;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PoloniexRestClient::builder()
    ///         .credentials(Arc::new(Credentials::from_env()?))
    ///         .build();
    ///
    ///     let order = PlaceOrderRequest::limit("BTC_USDT", Side::Buy, "20000".parse()?, "0.001".parse()?);
    ///     let placed = client.place_order(&order).await?;
    ///     println!("order id {}", placed.id);
    ///     Ok(())
    /// }
    /// ```
    pub async fn place_order(
        &self,
        request: &PlaceOrderRequest,
    ) -> Result<PlaceOrderResponse, PoloniexError> {
        self.private_post(private::ORDERS, request).await
    }

    /// Cancel an order by exchange id.
    pub async fn cancel_order(&self, order_id: &str) -> Result<CancelOrderResponse, PoloniexError> {
        self.private_delete(&private::order(order_id)).await
    }

    /// List open orders.
    pub async fn get_open_orders(
        &self,
        request: Option<&OpenOrdersRequest>,
    ) -> Result<Vec<Order>, PoloniexError> {
        self.private_get(private::ORDERS, request).await
    }

    /// List filled and cancelled orders, newest first.
    pub async fn get_order_history(
        &self,
        request: Option<&OrderHistoryRequest>,
    ) -> Result<Vec<Order>, PoloniexError> {
        self.private_get(private::ORDER_HISTORY, request).await
    }
}
