//! Order lookup walkthrough.
//!
//! Simulates a "list orders for customer" handler against an in-memory store:
//! validation errors are marked presentable, internal failures are logged with
//! their chain and hidden behind a generic message.
//!
//! Run with `LOG_LEVEL=debug cargo run --example order_lookup`.

use serde::Serialize;
use std::process::ExitCode;
use workshop_gadgets::{
    invalid_input, mark_presentable, presentable_message_or, BoxError, ErrorKind, JsonLogger,
    Logger, LoggerConfig, RequestContext, TypedError, CUSTOMER_ID_KEY,
};

const FALLBACK_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrderStatus {
    Placed,
    Delivered,
    Transit,
    OnHold,
}

#[derive(Debug, Clone)]
struct Order {
    customer_id: &'static str,
    order_id: &'static str,
    product_id: &'static str,
    status: OrderStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum SummaryStatus {
    Placed,
    Delivered,
    InTransit,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderSummary {
    order_id: &'static str,
    product_id: &'static str,
    status: SummaryStatus,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

struct OrderStore {
    orders: Vec<Order>,
}

impl OrderStore {
    fn seeded() -> Self {
        Self {
            orders: vec![
                Order {
                    customer_id: "customer1",
                    order_id: "order-1",
                    product_id: "HPE Alletra",
                    status: OrderStatus::Placed,
                },
                Order {
                    customer_id: "customer1",
                    order_id: "order-4",
                    product_id: "ProLiant DL380",
                    status: OrderStatus::Transit,
                },
                Order {
                    customer_id: "customer2",
                    order_id: "order-2",
                    product_id: "Margherita",
                    status: OrderStatus::Delivered,
                },
                Order {
                    customer_id: "customer3",
                    order_id: "order-3",
                    product_id: "Server Rack",
                    status: OrderStatus::OnHold,
                },
            ],
        }
    }

    fn orders_for(&self, customer_id: &str) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|order| order.customer_id == customer_id)
            .cloned()
            .collect()
    }
}

fn to_summary(order: &Order) -> workshop_gadgets::Result<OrderSummary> {
    let status = match order.status {
        OrderStatus::Placed => SummaryStatus::Placed,
        OrderStatus::Delivered => SummaryStatus::Delivered,
        OrderStatus::Transit => SummaryStatus::InTransit,
        other => {
            return Err(TypedError::invalid_parameter(
                "status",
                format!("{other:?} has no REST representation"),
            ));
        }
    };
    Ok(OrderSummary {
        order_id: order.order_id,
        product_id: order.product_id,
        status,
    })
}

fn list_orders(store: &OrderStore, customer_id: &str) -> Result<Vec<OrderSummary>, BoxError> {
    if customer_id.is_empty() {
        return Err(mark_presentable(invalid_input! { "customerID" => "must not be empty" }).into());
    }

    let orders = store.orders_for(customer_id);
    if orders.is_empty() {
        let err = TypedError::not_found("orders", "customerID", customer_id);
        return Err(mark_presentable(err).into());
    }

    orders
        .iter()
        .map(to_summary)
        .collect::<workshop_gadgets::Result<Vec<_>>>()
        .map_err(|err| TypedError::internal("failed to convert orders from core to rest").with_source(err).into())
}

fn status_for(err: &(dyn std::error::Error + 'static)) -> u16 {
    match workshop_gadgets::find_typed(err).map(TypedError::kind) {
        Some(ErrorKind::InvalidInput) => 400,
        Some(ErrorKind::NotFound) => 404,
        Some(ErrorKind::ServiceUnavailable) => 503,
        _ => 500,
    }
}

fn handle(ctx: &RequestContext, store: &OrderStore, customer_id: &str) -> (u16, String) {
    let logger: JsonLogger = match ctx.scoped_logger() {
        Ok(logger) => logger,
        Err(err) => return (500, format!("{{\"message\":\"{err}\"}}")),
    };
    let logger = logger.with_field(CUSTOMER_ID_KEY, customer_id);
    logger.debug("listing orders");

    let result = list_orders(store, customer_id).and_then(|summaries| {
        serde_json::to_string(&summaries).map_err(|err| {
            TypedError::internal("failed to marshal order summaries").with_source(err).into()
        })
    });

    match result {
        Ok(body) => {
            logger.info("orders listed");
            (200, body)
        }
        Err(err) => {
            let err: &(dyn std::error::Error + 'static) = err.as_ref();
            let status = status_for(err);
            if status >= 500 {
                logger.with_error(err).error("order listing failed");
            } else {
                logger.with_error(err).warn("order listing rejected");
            }

            let message = presentable_message_or(err, FALLBACK_MESSAGE);
            let body = serde_json::to_string(&ErrorBody { message: &message })
                .unwrap_or_else(|_| format!("{{\"message\":\"{FALLBACK_MESSAGE}\"}}"));
            (status, body)
        }
    }
}

fn main() -> ExitCode {
    let logger = match LoggerConfig::from_env().and_then(|config| config.build()) {
        Ok(logger) => logger.named("order-lookup"),
        Err(err) => {
            eprintln!("failed to build logger: {err}");
            return ExitCode::FAILURE;
        }
    };

    let store = OrderStore::seeded();
    let requests = [
        ("req-1", "customer1"),
        ("req-2", ""),
        ("req-3", "customer9"),
        ("req-4", "customer3"),
    ];

    for (trace_id, customer_id) in requests {
        let ctx = RequestContext::new()
            .with_logger(logger.clone())
            .with_trace(trace_id, format!("{trace_id}-span"));
        let (status, body) = handle(&ctx, &store, customer_id);
        println!("{status} {body}");
    }

    if let Err(err) = logger.flush() {
        eprintln!("failed to flush logs: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
