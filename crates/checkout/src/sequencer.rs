//! Checkout sequencer: turns a cart into an order while adjusting stock.

use cart::{CartSession, LineItem, Product, guard};
use chrono::Utc;
use futures_util::future::join_all;
use storage::LocalStorage;

use crate::error::{CheckoutError, Result};
use crate::services::identity::IdentityProvider;
use crate::services::orders::{NewOrder, Order, OrderLine, OrderService, OrderStatus};
use crate::services::products::ProductCatalog;
use crate::steps;

/// Runs checkout against explicitly provided collaborators.
///
/// Steps, in order:
/// 1. re-check every line against live stock
/// 2. decrement stock for every line, all requests in flight together
/// 3. create one order for the whole cart
/// 4. clear the cart
///
/// Any failure stops the sequence and leaves the cart as it was. Stock
/// decrements that succeeded before a failure in step 2 or 3 are not
/// reverted; they are logged so the discrepancy can be reconciled.
pub struct CheckoutSequencer<P, O, I>
where
    P: ProductCatalog,
    O: OrderService,
    I: IdentityProvider,
{
    products: P,
    orders: O,
    identity: I,
}

impl<P, O, I> CheckoutSequencer<P, O, I>
where
    P: ProductCatalog,
    O: OrderService,
    I: IdentityProvider,
{
    /// Creates a new checkout sequencer.
    pub fn new(products: P, orders: O, identity: I) -> Self {
        Self {
            products,
            orders,
            identity,
        }
    }

    /// Checks out the session's cart and returns the created order.
    #[tracing::instrument(skip(self, session), fields(lines = session.store().len()))]
    pub async fn checkout<S: LocalStorage>(&self, session: &mut CartSession<S>) -> Result<Order> {
        metrics::counter!("checkout_attempts_total").increment(1);
        let started = std::time::Instant::now();

        let result = self.run(session).await;

        let duration = started.elapsed().as_secs_f64();
        metrics::histogram!("checkout_duration_seconds").record(duration);
        match &result {
            Ok(order) => {
                metrics::counter!("checkout_completed_total").increment(1);
                tracing::info!(order_id = %order.id, total = %order.total, duration, "checkout completed");
            }
            Err(e) => {
                metrics::counter!("checkout_failed_total", "reason" => e.reason()).increment(1);
                tracing::warn!(error = %e, duration, "checkout failed");
            }
        }
        result
    }

    async fn run<S: LocalStorage>(&self, session: &mut CartSession<S>) -> Result<Order> {
        let user_id = self
            .identity
            .current_user()
            .ok_or(CheckoutError::NotSignedIn)?;

        if session.store().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lines: Vec<LineItem> = session.store().items().to_vec();

        // 1. Verify stock
        tracing::info!(step = steps::STEP_VERIFY_STOCK, "checkout step started");
        let live = self.fetch_live_products(&lines).await?;
        let shortfalls = guard::stock_shortfalls(session.store(), &live);
        if !shortfalls.is_empty() {
            return Err(CheckoutError::InsufficientStock {
                product_ids: shortfalls,
            });
        }

        // 2. Decrement stock
        tracing::info!(step = steps::STEP_DECREMENT_STOCK, "checkout step started");
        self.decrement_all(&lines).await?;

        // 3. Create order
        tracing::info!(step = steps::STEP_CREATE_ORDER, "checkout step started");
        let new_order = NewOrder {
            user_id,
            items: lines.iter().map(OrderLine::from).collect(),
            total: session.totals().total,
            status: OrderStatus::Completed,
            created_at: Utc::now(),
        };
        let order = match self.orders.create_order(new_order).await {
            Ok(order) => order,
            Err(e) => {
                let decremented: Vec<&str> = lines.iter().map(|l| l.product_id.as_str()).collect();
                tracing::warn!(
                    ?decremented,
                    "order creation failed after stock was decremented; decrements are not reverted"
                );
                return Err(CheckoutError::at_step(steps::STEP_CREATE_ORDER, e));
            }
        };

        // 4. Clear the cart
        session.clear();

        Ok(order)
    }

    /// Fetches the live product for every line, concurrently.
    ///
    /// Products that no longer exist are simply absent from the result.
    async fn fetch_live_products(&self, lines: &[LineItem]) -> Result<Vec<Product>> {
        let lookups = lines
            .iter()
            .map(|line| self.products.get_by_id(&line.product_id));

        let mut live = Vec::with_capacity(lines.len());
        for result in join_all(lookups).await {
            match result {
                Ok(Some(product)) => live.push(product),
                Ok(None) => {}
                Err(e) => return Err(CheckoutError::at_step(steps::STEP_VERIFY_STOCK, e)),
            }
        }
        Ok(live)
    }

    /// Dispatches every decrement at once and waits for all of them.
    ///
    /// Fails if any decrement failed. Nothing is cancelled early, so every
    /// request that could succeed has succeeded by the time this returns.
    async fn decrement_all(&self, lines: &[LineItem]) -> Result<()> {
        let decrements = lines.iter().map(|line| async move {
            let result = self
                .products
                .decrement_stock(&line.product_id, line.quantity)
                .await;
            (line, result)
        });

        let mut applied = Vec::new();
        let mut first_error = None;
        for (line, result) in join_all(decrements).await {
            match result {
                Ok(product) => {
                    tracing::debug!(product_id = %product.id, stock = product.stock, "stock decremented");
                    applied.push(line.product_id.as_str());
                }
                Err(e) => {
                    tracing::warn!(product_id = %line.product_id, error = %e, "stock decrement failed");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            None => Ok(()),
            Some(e) => {
                if !applied.is_empty() {
                    tracing::warn!(
                        decremented = ?applied,
                        "partial stock decrement; applied decrements are not reverted"
                    );
                }
                Err(CheckoutError::at_step(steps::STEP_DECREMENT_STOCK, e))
            }
        }
    }
}
