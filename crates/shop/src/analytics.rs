//! Aggregation engine: dashboard statistics from fetched lists.
//!
//! Every function here is pure over already-fetched customer/order lists -
//! no store access, no clock, no randomness. Given the same input list the
//! output is byte-identical: month buckets keep first-seen order, country
//! buckets keep insertion order until the final sort by count.

use indexmap::IndexMap;
use rust_decimal::Decimal;

use tailordesk_core::OrderStatus;

use crate::models::{Customer, Order};

/// Count orders per recognized status.
///
/// All four statuses are present in the result, zero-filled; insertion
/// order follows [`OrderStatus::ALL`] so the dashboard legend is stable.
/// Orders whose stored status this build does not recognize are excluded
/// from the histogram (they still count in plain listings).
#[must_use]
pub fn count_by_status(orders: &[Order]) -> IndexMap<OrderStatus, usize> {
    let mut counts: IndexMap<OrderStatus, usize> =
        OrderStatus::ALL.into_iter().map(|s| (s, 0)).collect();

    for order in orders {
        if let Some(slot) = counts.get_mut(&order.status) {
            *slot += 1;
        }
    }
    counts
}

/// Orders not yet delivered.
#[must_use]
pub fn pending_orders_count(orders: &[Order]) -> usize {
    orders
        .iter()
        .filter(|o| o.status != OrderStatus::Delivered)
        .count()
}

/// Total outstanding payment: Σ (price - advance paid).
///
/// Missing amounts deserialize as zero, so the sum holds for sparse legacy
/// records; the empty list sums to zero.
#[must_use]
pub fn pending_payment_total(orders: &[Order]) -> Decimal {
    orders.iter().map(Order::remaining).sum()
}

/// One month's bucket in a monthly series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTotal {
    /// Short month name (`"Jan"`, `"Feb"`, ...). Not year-qualified:
    /// orders from different years in the same calendar month share a
    /// bucket (known limitation, kept for chart parity).
    pub month: String,
    pub total: Decimal,
}

/// Sum an amount per calendar month of order creation.
///
/// Buckets appear in first-seen order of the input list. The `amount`
/// extractor selects which figure is charted (the revenue and sales charts
/// both sum `price` today).
#[must_use]
pub fn monthly_series<F>(orders: &[Order], amount: F) -> Vec<MonthlyTotal>
where
    F: Fn(&Order) -> Decimal,
{
    let mut monthly: IndexMap<String, Decimal> = IndexMap::new();

    for order in orders {
        let month = order.created_at.format("%b").to_string();
        *monthly.entry(month).or_insert(Decimal::ZERO) += amount(order);
    }

    monthly
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}

/// One country's share of the customer base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryShare {
    pub country: String,
    /// ISO code as stored (used for flag/map lookups).
    pub code: String,
    pub count: usize,
    /// `round(100 * count / total)` over customers with a country.
    pub percent: u32,
}

/// Distribution of customers by country, sorted by count descending.
///
/// Customers missing either the country name or the country code are
/// excluded from the denominator entirely (they are not an "unknown"
/// bucket). Ties keep first-seen order, so the result is deterministic.
#[must_use]
pub fn country_distribution(customers: &[Customer]) -> Vec<CountryShare> {
    let mut counts: IndexMap<&str, (&str, usize)> = IndexMap::new();
    let mut total = 0usize;

    for customer in customers {
        if customer.country.is_empty() || customer.country_code.is_empty() {
            continue;
        }
        total += 1;
        counts
            .entry(customer.country.as_str())
            .or_insert((customer.country_code.as_str(), 0))
            .1 += 1;
    }

    if total == 0 {
        return Vec::new();
    }

    let mut shares: Vec<CountryShare> = counts
        .into_iter()
        .map(|(country, (code, count))| {
            #[allow(
                clippy::cast_precision_loss,
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss
            )]
            let percent = ((count as f64 / total as f64) * 100.0).round() as u32;
            CountryShare {
                country: country.to_owned(),
                code: code.to_owned(),
                count,
                percent,
            }
        })
        .collect();

    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// The dashboard's headline numbers, computed in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub customers: usize,
    pub orders: usize,
    pub pending_orders: usize,
    pub pending_payment: Decimal,
    pub status_counts: IndexMap<OrderStatus, usize>,
}

impl DashboardStats {
    /// Derive the four stat cards and the status pie from fetched lists.
    #[must_use]
    pub fn compute(customers: &[Customer], orders: &[Order]) -> Self {
        Self {
            customers: customers.len(),
            orders: orders.len(),
            pending_orders: pending_orders_count(orders),
            pending_payment: pending_payment_total(orders),
            status_counts: count_by_status(orders),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use tailordesk_core::{CustomerId, Measurements, OrderId, Phone, ShopId};

    use super::*;

    fn order(price: i64, advance: i64, status: OrderStatus, created: (i32, u32, u32)) -> Order {
        let created_at = Utc
            .with_ymd_and_hms(created.0, created.1, created.2, 10, 0, 0)
            .unwrap();
        Order {
            id: OrderId::new("o"),
            shop_id: ShopId::new("shop-1"),
            customer_id: CustomerId::new("c"),
            customer_name: "Ravi".to_owned(),
            cloth_type: "Kurta".to_owned(),
            price: Decimal::from(price),
            advance_paid: Decimal::from(advance),
            delivery_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            status,
            measurements: Measurements::default(),
            images: Vec::new(),
            notes: String::new(),
            created_at,
            updated_at: created_at,
        }
    }

    fn customer(country: &str, code: &str) -> Customer {
        Customer {
            id: CustomerId::new("c"),
            shop_id: ShopId::new("shop-1"),
            name: "Ravi".to_owned(),
            phone: Phone::parse("9876543210").unwrap(),
            address: String::new(),
            country: country.to_owned(),
            country_code: code.to_owned(),
            state: String::new(),
            city: String::new(),
            last_measurements: Measurements::default(),
            notes: String::new(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_count_by_status_zero_fills_all_four() {
        let counts = count_by_status(&[]);
        assert_eq!(counts.len(), 4);
        assert!(counts.values().all(|&v| v == 0));

        let keys: Vec<OrderStatus> = counts.keys().copied().collect();
        assert_eq!(keys, OrderStatus::ALL);
    }

    #[test]
    fn test_count_by_status_excludes_unknown_statuses() {
        let orders = vec![
            order(100, 0, OrderStatus::Pending, (2026, 1, 1)),
            order(100, 0, OrderStatus::Unknown, (2026, 1, 2)),
            order(100, 0, OrderStatus::Delivered, (2026, 1, 3)),
        ];

        let counts = count_by_status(&orders);
        let histogram_total: usize = counts.values().sum();
        assert_eq!(histogram_total, 2); // the unknown one is excluded
        assert_eq!(counts[&OrderStatus::Pending], 1);
    }

    #[test]
    fn test_pending_orders_counts_everything_not_delivered() {
        let orders = vec![
            order(100, 0, OrderStatus::Pending, (2026, 1, 1)),
            order(100, 0, OrderStatus::Ready, (2026, 1, 2)),
            order(100, 0, OrderStatus::Delivered, (2026, 1, 3)),
        ];
        assert_eq!(pending_orders_count(&orders), 2);
    }

    #[test]
    fn test_pending_payment_total() {
        assert_eq!(pending_payment_total(&[]), Decimal::ZERO);

        let orders = vec![
            order(1000, 200, OrderStatus::Pending, (2026, 1, 1)),
            order(500, 500, OrderStatus::Delivered, (2026, 1, 2)),
            order(250, 0, OrderStatus::Ready, (2026, 1, 3)),
        ];
        assert_eq!(pending_payment_total(&orders), Decimal::from(1050));
    }

    #[test]
    fn test_monthly_series_buckets_by_month_first_seen() {
        let orders = vec![
            order(100, 0, OrderStatus::Pending, (2026, 3, 10)),
            order(200, 0, OrderStatus::Pending, (2026, 1, 5)),
            order(300, 0, OrderStatus::Pending, (2026, 3, 20)),
        ];

        let series = monthly_series(&orders, |o| o.price);
        let labels: Vec<&str> = series.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(labels, ["Mar", "Jan"]); // first-seen order, not calendar
        assert_eq!(series.first().unwrap().total, Decimal::from(400));
        assert_eq!(series.get(1).unwrap().total, Decimal::from(200));
    }

    #[test]
    fn test_monthly_series_is_deterministic() {
        let orders = vec![
            order(100, 0, OrderStatus::Pending, (2026, 5, 1)),
            order(250, 0, OrderStatus::Pending, (2026, 6, 1)),
        ];
        assert_eq!(
            monthly_series(&orders, |o| o.price),
            monthly_series(&orders, |o| o.price)
        );
    }

    #[test]
    fn test_country_distribution_example() {
        let customers = vec![
            customer("India", "IN"),
            customer("India", "IN"),
            customer("USA", "US"),
        ];

        let shares = country_distribution(&customers);
        assert_eq!(shares.len(), 2);

        let india = shares.first().unwrap();
        assert_eq!(india.country, "India");
        assert_eq!(india.count, 2);
        assert_eq!(india.percent, 67);

        let usa = shares.get(1).unwrap();
        assert_eq!(usa.country, "USA");
        assert_eq!(usa.count, 1);
        assert_eq!(usa.percent, 33);
    }

    #[test]
    fn test_country_distribution_excludes_customers_without_country() {
        let customers = vec![
            customer("India", "IN"),
            customer("", ""),
            customer("India", ""), // code missing: excluded too
        ];

        let shares = country_distribution(&customers);
        assert_eq!(shares.len(), 1);
        let india = shares.first().unwrap();
        assert_eq!(india.count, 1);
        assert_eq!(india.percent, 100); // denominator excludes the others
    }

    #[test]
    fn test_country_distribution_empty() {
        assert!(country_distribution(&[]).is_empty());
        assert!(country_distribution(&[customer("", "")]).is_empty());
    }

    #[test]
    fn test_country_ties_keep_first_seen_order() {
        let customers = vec![
            customer("India", "IN"),
            customer("USA", "US"),
            customer("France", "FR"),
            customer("USA", "US"),
        ];

        let shares = country_distribution(&customers);
        let names: Vec<&str> = shares.iter().map(|s| s.country.as_str()).collect();
        assert_eq!(names, ["USA", "India", "France"]);
    }

    #[test]
    fn test_dashboard_stats_compute() {
        let customers = vec![customer("India", "IN")];
        let orders = vec![
            order(1000, 200, OrderStatus::Pending, (2026, 1, 1)),
            order(400, 0, OrderStatus::Delivered, (2026, 2, 1)),
        ];

        let stats = DashboardStats::compute(&customers, &orders);
        assert_eq!(stats.customers, 1);
        assert_eq!(stats.orders, 2);
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.pending_payment, Decimal::from(1200));
        assert_eq!(stats.status_counts[&OrderStatus::Delivered], 1);
    }
}
