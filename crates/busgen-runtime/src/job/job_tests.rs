#![allow(non_snake_case)]

use super::*;
use busgen_core::{ClassName, SchedulerError};
use std::time::Duration;

fn target() -> GenerationTarget {
    GenerationTarget::observer("com.example.Bean")
}

fn artifact() -> GeneratedArtifact {
    GeneratedArtifact::new(
        ClassName::new("com.example", "Bean_ObserverSubscriptions"),
        "class Bean_ObserverSubscriptions {}",
    )
}

#[test]
fn Job___new___is_pending() {
    let job = Job::new(target());

    assert_eq!(job.state(), JobState::Pending);
    assert!(job.try_outcome().is_none());
}

#[test]
fn Job___start___moves_to_running_once() {
    let job = Job::new(target());

    assert!(job.start());
    assert!(!job.start());
    assert_eq!(job.state(), JobState::Running);
}

#[test]
fn Job___finish_ok___is_done() {
    let job = Job::new(target());
    job.start();

    assert!(job.finish(Ok(Arc::new(artifact()))));

    assert_eq!(job.state(), JobState::Done);
}

#[test]
fn Job___finish_err_while_pending___is_failed() {
    let job = Job::new(target());

    assert!(job.finish(Err(SchedulerError::ShutDown.into())));

    assert_eq!(job.state(), JobState::Failed);
    assert!(!job.start());
}

#[test]
fn Job___finish_twice___keeps_first_outcome() {
    let job = Job::new(target());
    job.start();
    job.finish(Ok(Arc::new(artifact())));

    let second = job.finish(Err(SchedulerError::ShutDown.into()));

    assert!(!second);
    assert_eq!(job.state(), JobState::Done);
    assert!(job.try_outcome().unwrap().is_ok());
}

#[test]
fn Job___finish_ok_while_pending___is_ignored() {
    let job = Job::new(target());

    assert!(!job.finish(Ok(Arc::new(artifact()))));

    assert_eq!(job.state(), JobState::Pending);
}

#[test]
fn JobHandle___wait___blocks_until_finished() {
    let job = Arc::new(Job::new(target()));
    let handle = JobHandle::new(job.clone());

    let worker = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        job.start();
        job.finish(Ok(Arc::new(artifact())));
    });
    let outcome = handle.wait().unwrap();
    worker.join().unwrap();

    assert_eq!(*outcome, artifact());
    assert!(handle.is_finished());
}

#[test]
fn JobHandle___wait_on_failed_job___returns_error_to_every_waiter() {
    let job = Arc::new(Job::new(target()));
    let first = JobHandle::new(job.clone());
    let second = first.clone();
    job.finish(Err(SchedulerError::ShutDown.into()));

    assert_eq!(first.wait(), Err(SchedulerError::ShutDown.into()));
    assert_eq!(second.wait(), Err(SchedulerError::ShutDown.into()));
}

#[test]
fn JobHandle___same_job___compares_identity() {
    let job = Arc::new(Job::new(target()));
    let a = JobHandle::new(job.clone());
    let b = a.clone();
    let other = JobHandle::new(Arc::new(Job::new(target())));

    assert!(a.same_job(&b));
    assert!(!a.same_job(&other));
}

#[test]
fn JobHandle___debug___shows_target_and_state() {
    let handle = JobHandle::new(Arc::new(Job::new(target())));

    let debug = format!("{handle:?}");

    assert!(debug.contains("com.example.Bean"));
    assert!(debug.contains("Pending"));
}
