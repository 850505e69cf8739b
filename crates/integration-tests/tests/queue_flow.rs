//! End-to-end queue behavior over the in-memory store

mod common;

use common::{codes, memory_service};
use std::collections::BTreeSet;
use ticketline_core::domain::{Category, ContactInfo, QueueConfig, TicketStatus};
use ticketline_core::error::AppError;
use ticketline_core::port::TicketStore;
use tokio::sync::broadcast::error::TryRecvError;

#[tokio::test]
async fn test_first_ticket_is_served_then_completed() {
    let (service, _store) = memory_service(QueueConfig::default());

    let w01 = service.create_ticket(Category::Withdraw, None).await.unwrap();
    assert_eq!(w01.code.as_str(), "W01");
    assert_eq!(w01.status, TicketStatus::Waiting);

    let serving = service.advance_queue(None).await.unwrap().unwrap();
    assert_eq!(serving.id, w01.id);
    assert_eq!(serving.status, TicketStatus::Serving);
    assert_eq!(serving.counter, Some(1));

    let next = service.advance_queue(Some(&w01.id)).await.unwrap();
    assert!(next.is_none());

    let done = service.get_ticket(&w01.id).await.unwrap();
    assert_eq!(done.status, TicketStatus::Completed);
    assert!(done.completed_at.is_some());
    assert!(service.current_ticket().await.unwrap().is_none());
    assert!(service.waiting_list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sequence_wraps_after_maximum() {
    let (service, _store) = memory_service(QueueConfig::default());

    let mut issued = Vec::new();
    for _ in 0..51 {
        issued.push(service.create_ticket(Category::Saving, None).await.unwrap());
    }

    assert_eq!(issued[0].code.as_str(), "S01");
    assert_eq!(issued[9].code.as_str(), "S10");
    assert_eq!(issued[49].code.as_str(), "S50");
    // Reissued while S01 is still waiting
    assert_eq!(issued[50].code.as_str(), "S01");
}

#[tokio::test]
async fn test_categories_number_independently() {
    let (service, _store) = memory_service(QueueConfig::default());

    for category in [
        Category::Loan,
        Category::LoanReleasing,
        Category::Loan,
        Category::Member,
        Category::LoanReleasing,
    ] {
        service.create_ticket(category, None).await.unwrap();
    }

    let waiting = service.waiting_list().await.unwrap();
    assert_eq!(codes(&waiting), vec!["L01", "LR01", "L02", "M01", "LR02"]);
}

#[tokio::test]
async fn test_fifo_across_categories() {
    let (service, _store) = memory_service(QueueConfig::default());

    let loan = service.create_ticket(Category::Loan, None).await.unwrap();
    let withdraw = service.create_ticket(Category::Withdraw, None).await.unwrap();
    let insurance = service.create_ticket(Category::Insurance, None).await.unwrap();

    let first = service.advance_queue(None).await.unwrap().unwrap();
    assert_eq!(first.id, loan.id);

    let second = service.advance_queue(Some(&first.id)).await.unwrap().unwrap();
    assert_eq!(second.id, withdraw.id);
    assert_eq!(
        service.get_ticket(&loan.id).await.unwrap().status,
        TicketStatus::Completed
    );

    let third = service.advance_queue(Some(&second.id)).await.unwrap().unwrap();
    assert_eq!(third.id, insurance.id);
    assert_eq!(service.current_ticket().await.unwrap().map(|t| t.id), Some(insurance.id));
}

#[tokio::test]
async fn test_advance_with_nothing_waiting_writes_nothing() {
    let (service, store) = memory_service(QueueConfig::default());
    let mut feed = store.changes();

    assert!(service.advance_queue(None).await.unwrap().is_none());

    assert_eq!(feed.try_recv(), Err(TryRecvError::Empty));
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_advance_rejects_unknown_current() {
    let (service, _store) = memory_service(QueueConfig::default());
    let waiting = service.create_ticket(Category::Member, None).await.unwrap();

    let err = service
        .advance_queue(Some(&"no-such-ticket".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Nothing was served by the failed call
    let still = service.get_ticket(&waiting.id).await.unwrap();
    assert_eq!(still.status, TicketStatus::Waiting);
}

#[tokio::test]
async fn test_reset_clears_queue_and_restarts_numbering() {
    let (service, _store) = memory_service(QueueConfig::default());
    service.create_ticket(Category::Withdraw, None).await.unwrap();
    service.create_ticket(Category::Withdraw, None).await.unwrap();
    service.advance_queue(None).await.unwrap();

    assert_eq!(service.reset_all().await.unwrap(), 2);
    assert!(service.current_ticket().await.unwrap().is_none());
    assert!(service.waiting_list().await.unwrap().is_empty());
    assert!(service.all_tickets().await.unwrap().is_empty());

    let fresh = service.create_ticket(Category::Withdraw, None).await.unwrap();
    assert_eq!(fresh.code.as_str(), "W01");
}

#[tokio::test]
async fn test_contact_details_are_kept() {
    let (service, _store) = memory_service(QueueConfig::default());
    let contact = ContactInfo::new("Ana Cruz", "0917 555 0101", "Cebu City");

    let ticket = service
        .create_ticket(Category::LoanReleasing, Some(contact.clone()))
        .await
        .unwrap();

    let stored = service.get_ticket(&ticket.id).await.unwrap();
    assert_eq!(stored.contact, Some(contact));
    assert_eq!(stored.code.as_str(), "LR01");
}

#[tokio::test]
async fn test_concurrent_allocation_issues_distinct_codes() {
    let (service, _store) = memory_service(QueueConfig::default());

    let mut handles = Vec::new();
    for _ in 0..20 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.create_ticket(Category::Loan, None).await
        }));
    }

    let mut issued = BTreeSet::new();
    for handle in handles {
        let ticket = handle.await.unwrap().unwrap();
        issued.insert(ticket.code.as_str().to_string());
    }

    let expected: BTreeSet<String> = (1..=20).map(|n| format!("L{:02}", n)).collect();
    assert_eq!(issued, expected);
}

#[tokio::test]
async fn test_concurrent_advance_serves_each_ticket_once() {
    let (service, _store) = memory_service(QueueConfig::default());
    for _ in 0..5 {
        service.create_ticket(Category::Withdraw, None).await.unwrap();
    }

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move { service.advance_queue(None).await }));
    }

    let mut served = BTreeSet::new();
    let mut empty = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            Some(ticket) => assert!(served.insert(ticket.id)),
            None => empty += 1,
        }
    }
    assert_eq!(served.len(), 5);
    assert_eq!(empty, 3);
}

#[tokio::test]
async fn test_stats_track_lifecycle() {
    let (service, _store) = memory_service(QueueConfig::default());
    let first = service.create_ticket(Category::Saving, None).await.unwrap();
    service.create_ticket(Category::Saving, None).await.unwrap();
    service.create_ticket(Category::Member, None).await.unwrap();

    service.advance_queue(None).await.unwrap();
    service.complete_ticket(&first.id).await.unwrap();
    service.advance_queue(None).await.unwrap();

    let stats = service.stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.serving, 1);
    assert_eq!(stats.waiting, 1);
    assert_eq!(stats.waiting_by_category.get(&Category::Member), Some(&1));
    assert_eq!(stats.waiting_by_category.get(&Category::Saving), Some(&0));
}
