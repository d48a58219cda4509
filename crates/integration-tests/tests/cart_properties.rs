//! Cart store behavior across operation sequences and storage backends.
//!
//! Run with: cargo test -p puppyracer-integration-tests --test `cart_properties`

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use proptest::prelude::*;
use puppyracer_core::{CartLineItem, MAX_PRICE, ProductId, ProductInput, is_valid_price};
use puppyracer_integration_tests::{dec, product};
use puppyracer_storefront::cart::{
    CART_STORAGE_KEY, CartError, CartStore, FileStorage, LocalStorage, MemoryStorage,
    QuantityChange,
};
use rust_decimal::Decimal;

/// Largest valid price in cents.
const MAX_CENTS: i64 = 999_999_999_999_999;

#[derive(Debug, Clone)]
enum Op {
    Add(i32, Decimal, i64),
    Increase(i32),
    Decrease(i32),
    Update(i32, i64),
    Remove(i32),
}

/// Valid prices: whole cents from zero up to `MAX_PRICE`, biased towards
/// both ends of the range.
fn price_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        0..=10_000i64,
        0..=MAX_CENTS,
        (MAX_CENTS - 100)..=MAX_CENTS,
    ]
    .prop_map(|cents| Decimal::new(cents, 2))
}

fn quantity_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![
        1..=10i64,
        1..=i64::from(u32::MAX),
        (i64::from(u32::MAX) - 3)..=i64::from(u32::MAX),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let id = 1..=5i32;
    prop_oneof![
        (id.clone(), price_strategy(), quantity_strategy())
            .prop_map(|(id, price, qty)| Op::Add(id, price, qty)),
        id.clone().prop_map(Op::Increase),
        id.clone().prop_map(Op::Decrease),
        (id.clone(), prop_oneof![-3..=10i64, any::<i64>()])
            .prop_map(|(id, qty)| Op::Update(id, qty)),
        id.prop_map(Op::Remove),
    ]
}

fn apply<S: LocalStorage>(cart: &mut CartStore<S>, op: &Op) {
    match *op {
        Op::Add(id, price, qty) => {
            let input = ProductInput::new(ProductId::new(id))
                .with_name("Item")
                .with_price(price)
                .with_quantity(qty);
            cart.add_to_cart(input).unwrap();
        }
        Op::Increase(id) => {
            cart.increase_quantity(ProductId::new(id));
        }
        Op::Decrease(id) => {
            cart.decrease_quantity(ProductId::new(id));
        }
        Op::Update(id, qty) => {
            cart.update_quantity(ProductId::new(id), qty);
        }
        Op::Remove(id) => {
            cart.remove_from_cart(ProductId::new(id));
        }
    }
}

fn expected_subtotal(items: &[CartLineItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn repeated_adds_merge_into_one_line(quantities in prop::collection::vec(1..=50i64, 1..20)) {
        let mut cart = CartStore::open(MemoryStorage::new());
        for qty in &quantities {
            cart.add_to_cart(product(7, "Rote Regenjacke", "34.95").with_quantity(*qty)).unwrap();
        }

        let expected: i64 = quantities.iter().sum();
        prop_assert_eq!(cart.items().len(), 1);
        prop_assert_eq!(i64::from(cart.items()[0].quantity), expected);
    }

    #[test]
    fn no_zero_quantity_lines_survive(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut cart = CartStore::open(MemoryStorage::new());
        for op in &ops {
            apply(&mut cart, op);
            prop_assert!(cart.items().iter().all(|item| item.quantity >= 1));

            let ids: HashSet<_> = cart.items().iter().map(|item| item.id).collect();
            prop_assert_eq!(ids.len(), cart.items().len());
        }
    }

    #[test]
    fn aggregates_match_items(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut cart = CartStore::open(MemoryStorage::new());
        for op in &ops {
            apply(&mut cart, op);
        }

        let subtotal = expected_subtotal(cart.items());
        let item_count: u64 = cart.items().iter().map(|item| u64::from(item.quantity)).sum();
        let shipping = if cart.items().is_empty() { Decimal::ZERO } else { dec("4.99") };

        prop_assert_eq!(cart.subtotal(), subtotal);
        prop_assert_eq!(cart.shipping_cost(), shipping);
        prop_assert_eq!(cart.total(), subtotal + shipping);
        prop_assert_eq!(cart.item_count(), item_count);
        prop_assert_eq!(cart.is_empty(), cart.items().is_empty());
    }

    #[test]
    fn restored_cart_matches_saved_cart(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::open(storage.clone());
        for op in &ops {
            apply(&mut cart, op);
        }

        let restored = CartStore::open(storage);
        prop_assert_eq!(restored.items(), cart.items());
        prop_assert_eq!(restored.total(), cart.total());
    }

    #[test]
    fn any_price_is_kept_exactly_or_rejected(
        mantissa in any::<i64>(),
        scale in 0..=28u32,
        qty in quantity_strategy(),
    ) {
        let price = Decimal::new(mantissa, scale);
        let storage = MemoryStorage::new();
        let mut cart = CartStore::open(storage.clone());

        let result = cart.add_to_cart(
            ProductInput::new(ProductId::new(1))
                .with_name("Item")
                .with_price(price)
                .with_quantity(qty),
        );

        if is_valid_price(price) {
            let item = result.unwrap();
            prop_assert_eq!(item.price, price);
            prop_assert_eq!(cart.subtotal(), price * Decimal::from(item.quantity));

            let restored = CartStore::open(storage);
            prop_assert_eq!(restored.items(), cart.items());
        } else {
            let rejected = matches!(result, Err(CartError::InvalidPrice { .. }));
            prop_assert!(rejected);
            prop_assert!(cart.is_empty());
            prop_assert!(storage.get_item(CART_STORAGE_KEY).unwrap().is_none());
        }
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_cleared_cart_baseline() {
    let mut cart = CartStore::open(MemoryStorage::new());
    cart.add_to_cart(product(1, "Premium Lederleine", "29.99").with_quantity(2))
        .unwrap();
    cart.add_to_cart(product(10, "Pedigree Trockenfutter", "18.49"))
        .unwrap();

    cart.clear_cart();

    assert_eq!(cart.item_count(), 0);
    assert_eq!(cart.subtotal(), Decimal::ZERO);
    assert_eq!(cart.shipping_cost(), Decimal::ZERO);
    assert_eq!(cart.total(), Decimal::ZERO);
    assert!(cart.is_empty());
}

#[test]
fn test_add_then_decrease_to_empty() {
    let mut cart = CartStore::open(MemoryStorage::new());
    cart.add_to_cart(product(1, "Item", "20.00").with_quantity(2))
        .unwrap();
    cart.add_to_cart(product(1, "Item", "20.00").with_quantity(1))
        .unwrap();

    assert_eq!(cart.items().len(), 1);
    let item = cart.get_item(ProductId::new(1)).unwrap();
    assert_eq!(item.quantity, 3);
    assert_eq!(cart.subtotal(), dec("60.00"));
    assert_eq!(cart.total(), dec("64.99"));

    let id = ProductId::new(1);
    assert_eq!(cart.decrease_quantity(id), QuantityChange::Updated(2));
    assert_eq!(cart.decrease_quantity(id), QuantityChange::Updated(1));
    assert_eq!(cart.decrease_quantity(id), QuantityChange::Removed);
    assert!(cart.is_empty());
    assert_eq!(cart.total(), Decimal::ZERO);
}

#[test]
fn test_round_trip_through_file_storage() {
    let dir = tempfile::tempdir().unwrap();

    let mut cart = CartStore::open(FileStorage::open(dir.path()).unwrap());
    cart.add_to_cart(
        product(1, "Premium Lederleine", "29.99")
            .with_description("Robuste Leine aus dunklem Vollleder.")
            .with_category("leinen")
            .with_quantity(2),
    )
    .unwrap();
    cart.add_to_cart(product(5, "Lederhalsband", "24.90").with_quantity(1))
        .unwrap();
    cart.add_to_cart(product(101, "Afghan Hound", "2000.00").with_quantity(4))
        .unwrap();
    cart.increase_quantity(ProductId::new(5));

    let restored = CartStore::open(FileStorage::open(dir.path()).unwrap());
    assert_eq!(restored.items(), cart.items());
    assert_eq!(restored.total(), cart.total());
    assert_eq!(restored.get_item(ProductId::new(5)).unwrap().quantity, 2);
}

#[test]
fn test_saved_cart_keeps_prices_numeric() {
    let storage = MemoryStorage::new();
    let mut cart = CartStore::open(storage.clone());
    cart.add_to_cart(product(2, "Stoffleine mit Griff", "14.99"))
        .unwrap();

    let raw = storage.get_item(CART_STORAGE_KEY).unwrap().unwrap();
    let saved: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(saved[0]["price"].is_number());
    assert_eq!(saved[0]["price"], 14.99);
    assert_eq!(saved[0]["quantity"], 1);
}

#[test]
fn test_corrupt_saved_cart_starts_empty() {
    let storage = MemoryStorage::new();
    storage.set_item(CART_STORAGE_KEY, "{not json").unwrap();

    let mut cart = CartStore::open(storage.clone());
    assert!(cart.is_empty());

    // The next change overwrites the corrupt value
    cart.add_to_cart(product(3, "Leine in Rot", "17.49")).unwrap();
    let restored = CartStore::open(storage);
    assert_eq!(restored.items().len(), 1);
}

#[test]
fn test_storage_failure_keeps_in_memory_cart() {
    let storage = MemoryStorage::with_quota(16);
    let mut cart = CartStore::open(storage.clone());

    cart.add_to_cart(product(11, "Activa Gold Futter", "22.99").with_quantity(2))
        .unwrap();

    assert_eq!(cart.item_count(), 2);
    assert!(storage.get_item(CART_STORAGE_KEY).unwrap().is_none());
}

#[test]
fn test_price_and_quantity_limits_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = CartStore::open(FileStorage::open(dir.path()).unwrap());

    cart.add_to_cart(
        product(1, "Premium Lederleine", "0.01").with_quantity(i64::from(u32::MAX)),
    )
    .unwrap();
    cart.add_to_cart(
        ProductInput::new(ProductId::new(101))
            .with_name("Afghan Hound")
            .with_price(MAX_PRICE)
            .with_quantity(i64::from(u32::MAX)),
    )
    .unwrap();
    cart.increase_quantity(ProductId::new(101));

    let expected = (dec("0.01") + MAX_PRICE) * Decimal::from(u32::MAX);
    assert_eq!(cart.subtotal(), expected);
    assert_eq!(cart.total(), expected + dec("4.99"));

    let restored = CartStore::open(FileStorage::open(dir.path()).unwrap());
    assert_eq!(restored.items(), cart.items());
    assert_eq!(restored.total(), cart.total());
}

#[test]
fn test_out_of_range_prices_are_rejected() {
    let storage = MemoryStorage::new();
    let mut cart = CartStore::open(storage.clone());

    for price in [
        Decimal::MAX,
        MAX_PRICE + dec("0.01"),
        dec("0.1234567890123456789"),
        dec("12345678901234567.89"),
        dec("-0.01"),
    ] {
        let result = cart.add_to_cart(
            ProductInput::new(ProductId::new(1))
                .with_name("Item")
                .with_price(price)
                .with_quantity(2),
        );
        assert!(
            matches!(result, Err(CartError::InvalidPrice { .. })),
            "price {price}"
        );
    }

    assert_eq!(cart.summary().total, Decimal::ZERO);
    assert!(storage.get_item(CART_STORAGE_KEY).unwrap().is_none());
}
