use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use paperfolio_backend::models::{AddFundsRequest, BuyRequest, SellRequest, WithdrawRequest};
use paperfolio_backend::services::engine::PortfolioEngine;
use paperfolio_backend::store::MemoryStore;

fn dec(s: &str) -> BigDecimal {
    s.parse().unwrap()
}

async fn funded_engine(amount: &str) -> (Arc<PortfolioEngine>, Uuid) {
    let engine = Arc::new(PortfolioEngine::new(Arc::new(MemoryStore::new())));
    let user = Uuid::new_v4();
    engine.register_user(user).await.unwrap();
    engine
        .add_funds(user, AddFundsRequest { amount: dec(amount) })
        .await
        .unwrap();
    (engine, user)
}

// Two buys racing on a symbol neither has held before must both land:
// quantity 2, not a lost update where the second write clobbers the first.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_buys_on_fresh_symbol_do_not_lose_updates() {
    let (engine, user) = funded_engine("1000").await;

    let tasks: Vec<_> = (0..2)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine
                    .buy(
                        user,
                        BuyRequest {
                            symbol: "AAPL".into(),
                            quantity: 1,
                            price: dec("100"),
                        },
                    )
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let holdings = engine.get_holdings(user).await.unwrap();
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0].quantity, 2);
    assert_eq!(holdings[0].avg_cost, dec("100"));
    assert_eq!(engine.get_wallet(user).await.unwrap().balance, dec("800"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn many_parallel_buys_spend_exactly_the_funded_amount() {
    let (engine, user) = funded_engine("200").await;

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine
                    .buy(
                        user,
                        BuyRequest {
                            symbol: "TCS.NS".into(),
                            quantity: 1,
                            price: dec("10"),
                        },
                    )
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let holdings = engine.get_holdings(user).await.unwrap();
    assert_eq!(holdings[0].symbol, "TCS");
    assert_eq!(holdings[0].quantity, 20);
    assert_eq!(engine.get_wallet(user).await.unwrap().balance, dec("0"));
}

// Buys with divergent prices racing against sells: whatever the interleaving,
// the ledger replay must reconcile with the final balance.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn mixed_concurrent_operations_conserve_value() {
    let (engine, user) = funded_engine("10000").await;
    // Seed a position so sells have something to dispose of.
    engine
        .buy(
            user,
            BuyRequest {
                symbol: "MSFT".into(),
                quantity: 50,
                price: dec("10"),
            },
        )
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for i in 0..10 {
        let engine = engine.clone();
        tasks.push(tokio::spawn(async move {
            let _ = engine
                .buy(
                    user,
                    BuyRequest {
                        symbol: "MSFT".into(),
                        quantity: 2,
                        price: dec(if i % 2 == 0 { "12" } else { "8" }),
                    },
                )
                .await;
        }));
    }
    for _ in 0..10 {
        let engine = engine.clone();
        tasks.push(tokio::spawn(async move {
            let _ = engine
                .sell(
                    user,
                    SellRequest {
                        symbol: "MSFT".into(),
                        quantity: 3,
                        price: dec("11"),
                    },
                )
                .await;
        }));
    }
    for _ in 0..5 {
        let engine = engine.clone();
        tasks.push(tokio::spawn(async move {
            let _ = engine
                .withdraw(user, WithdrawRequest { amount: dec("100") })
                .await;
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let summary = engine.funds_summary(user).await.unwrap();
    assert!(summary.reconciled, "ledger replay diverged from balance: {summary:?}");

    // Quantity bookkeeping also has to add up: seeded 50, +2 per landed buy,
    // -3 per landed sell.
    let history = engine.get_history(user, None).await.unwrap();
    let bought: i64 = history
        .iter()
        .filter(|e| e.symbol.is_some() && e.quantity.is_some())
        .filter(|e| e.entry_type == paperfolio_backend::models::EntryType::Buy)
        .map(|e| e.quantity.unwrap())
        .sum();
    let sold: i64 = history
        .iter()
        .filter(|e| e.entry_type == paperfolio_backend::models::EntryType::Sell)
        .map(|e| e.quantity.unwrap())
        .sum();
    let held: i64 = engine
        .get_holdings(user)
        .await
        .unwrap()
        .iter()
        .map(|h| h.quantity)
        .sum();
    assert_eq!(bought - sold, held);
}

// Operations for different users never contend with each other.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn users_are_isolated() {
    let engine = Arc::new(PortfolioEngine::new(Arc::new(MemoryStore::new())));
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    engine.register_user(a).await.unwrap();
    engine.register_user(b).await.unwrap();
    engine
        .add_funds(a, AddFundsRequest { amount: dec("100") })
        .await
        .unwrap();
    engine
        .add_funds(b, AddFundsRequest { amount: dec("300") })
        .await
        .unwrap();

    let ta = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine
                .buy(
                    a,
                    BuyRequest {
                        symbol: "AAPL".into(),
                        quantity: 1,
                        price: dec("100"),
                    },
                )
                .await
        })
    };
    let tb = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine
                .buy(
                    b,
                    BuyRequest {
                        symbol: "AAPL".into(),
                        quantity: 3,
                        price: dec("100"),
                    },
                )
                .await
        })
    };
    ta.await.unwrap().unwrap();
    tb.await.unwrap().unwrap();

    assert_eq!(engine.get_wallet(a).await.unwrap().balance, dec("0"));
    assert_eq!(engine.get_wallet(b).await.unwrap().balance, dec("0"));
    assert_eq!(engine.get_holdings(a).await.unwrap()[0].quantity, 1);
    assert_eq!(engine.get_holdings(b).await.unwrap()[0].quantity, 3);
}
