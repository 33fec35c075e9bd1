use std::sync::Arc;
use std::time::Duration;

use referee::adapter::outbound::sqlite::SqliteOpportunityRepository;
use referee::application::{ExecutionOutcome, ExecutionSimulator};
use referee::port::OpportunityRepository;
use referee::testkit::domain::opportunity;
use tokio::sync::watch;

fn open(dir: &tempfile::TempDir) -> SqliteOpportunityRepository {
    let path = dir.path().join("referee.db");
    SqliteOpportunityRepository::open(path.to_str().unwrap()).unwrap()
}

#[tokio::test]
async fn simulated_execution_lands_in_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open(&dir);
    let simulator = ExecutionSimulator::new(
        Duration::from_millis(5),
        Duration::from_secs(2),
        Arc::new(repo.clone()) as Arc<dyn OpportunityRepository>,
    );
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    let opp = opportunity("kraken", "binance");
    let outcome = simulator.execute(opp.clone(), shutdown_rx).await;

    assert_eq!(outcome, ExecutionOutcome::Persisted);
    let rows = repo.recent(5).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].opportunity_id, opp.id().to_string());
    assert_eq!(rows[0].net_profit, opp.net_profit().to_string());
}

#[tokio::test]
async fn rows_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    {
        let repo = open(&dir);
        repo.log_opportunity(&opportunity("kraken", "binance"))
            .await
            .unwrap();
        repo.log_opportunity(&opportunity("binance", "kraken"))
            .await
            .unwrap();
    }

    let reopened = open(&dir);
    assert_eq!(reopened.count().unwrap(), 2);
    assert_eq!(reopened.recent(1).unwrap()[0].buy_source, "binance");
}

#[tokio::test]
async fn concurrent_writers_do_not_lose_rows() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open(&dir);

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..10 {
        let repo = repo.clone();
        tasks.spawn(async move { repo.log_opportunity(&opportunity("kraken", "binance")).await });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    assert_eq!(repo.count().unwrap(), 10);
}
