use log::{info, warn};
use railway::{failure_with, success, success_with, FromPayload, Kind, Outcome, Tag};
use serde_json::json;

#[derive(Debug, FromPayload)]
struct Order {
    price: f64,
    coupon: Option<String>,
}

#[derive(Debug, FromPayload)]
struct Total(f64);

struct OrderService {
    tax: f64,
}

impl OrderService {
    fn apply(&self, value: f64) -> Outcome {
        let price = value + value * self.tax;

        if price < 100.0 {
            return failure_with(format!("{} is below the minimum order", price), "priceless");
        }
        success(json!({ "price": price, "coupon": "WELCOME" }))
    }
}

fn discount(order: Order) -> Outcome {
    info!("discount - order: {:?}", order);
    match order.coupon.as_deref() {
        Some("WELCOME") => success_with(order.price * 0.9, "discounted"),
        Some(other) => failure_with(format!("unknown coupon {}", other), "invalid_coupon"),
        None => success(order.price),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let service = OrderService { tax: 0.1 };

    for value in [100.0, 80.0] {
        let mut outcome = service.apply(value);
        outcome
            .step(discount)
            .step(|Total(total): Total| (total * 100.0).round() / 100.0)
            .on(Kind::Success, "discounted", |total: f64| {
                info!("order of {} charged {}", value, total)
            })
            .on_failure("priceless", |reason: String| {
                warn!("order of {} rejected: {}", value, reason)
            })
            .otherwise(|| info!("order of {} left untouched", value));

        let summary = outcome.match_with(
            |total: f64, tag: Tag| format!("{}: {}", tag, total),
            |reason: String, tag: Tag| format!("{}: {}", tag, reason),
        )?;
        info!("main - {}", summary);
    }

    Ok(())
}
