//! Seed data written when a store is first initialized

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

/// A drink on the initial menu
#[derive(Debug, Clone, Copy)]
pub struct SeedDrink {
    pub name: &'static str,
    pub price: Decimal,
    pub description: &'static str,
}

/// An initial order, pointing at a drink by its position in [`drinks`]
#[derive(Debug, Clone, Copy)]
pub struct SeedOrder {
    pub drink: usize,
    pub amount: u64,
    pub created_at: DateTime<Utc>,
}

pub fn drinks() -> Vec<SeedDrink> {
    vec![
        SeedDrink {
            name: "Espresso",
            price: Decimal::new(250, 2),
            description: "Strong coffee shot",
        },
        SeedDrink {
            name: "Cappuccino",
            price: Decimal::new(400, 2),
            description: "Coffee with milk foam",
        },
        SeedDrink {
            name: "Matcha Latte",
            price: Decimal::new(450, 2),
            description: "Green tea powder with steamed milk",
        },
        SeedDrink {
            name: "Chai Latte",
            price: Decimal::new(375, 2),
            description: "Spiced black tea with milk",
        },
        SeedDrink {
            name: "Iced Tea",
            price: Decimal::new(300, 2),
            description: "Chilled tea served with lemon",
        },
        SeedDrink {
            name: "Hot Chocolate",
            price: Decimal::new(500, 2),
            description: "Rich and creamy chocolate drink",
        },
    ]
}

pub fn orders() -> Vec<SeedOrder> {
    [
        (0, 2, (2, 15, 4, 5)),
        (1, 3, (3, 15, 4, 25)),
        (2, 1, (4, 15, 24, 5)),
        (3, 2, (5, 19, 4, 5)),
        (4, 5, (6, 15, 4, 5)),
        (5, 8, (7, 15, 4, 5)),
    ]
    .into_iter()
    .map(|(drink, amount, (day, hour, min, sec))| SeedOrder {
        drink,
        amount,
        created_at: Utc
            .with_ymd_and_hms(2025, 9, day, hour, min, sec)
            .single()
            .unwrap_or_default(),
    })
    .collect()
}
