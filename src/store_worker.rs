// src/store_worker.rs
//! A single thread owns the [`Store`] so writes submitted from the UI never
//! interleave with reads. Requests are served in the order they were sent.
use crate::db::{Error, PersonalBest, Store, WorkoutEntry};
use crate::event::AppEvent;
use chrono::NaiveDate;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

type Reply<T> = Sender<Result<T, Error>>;

enum Request {
    Insert {
        exercise: String,
        weight: Option<u32>,
        reps: Option<u32>,
        date: Option<NaiveDate>,
    },
    DeleteExercise(String),
    ListExercises(Reply<Vec<String>>),
    History(u32, Reply<Vec<WorkoutEntry>>),
    Bests(u32, Reply<Vec<PersonalBest>>),
    SetsOn(NaiveDate, Reply<Vec<WorkoutEntry>>),
}

/// Cloneable front end of the store worker.
#[derive(Clone)]
pub struct StoreHandle {
    tx: Sender<Request>,
}

/// Joins the worker once every handle is gone, flushing queued writes.
pub struct StoreWorker {
    thread: JoinHandle<()>,
}

impl StoreWorker {
    pub fn join(self) {
        if self.thread.join().is_err() {
            error!("store worker panicked");
        }
    }
}

/// Moves `store` onto its own thread. Write failures are reported on `events`.
pub fn spawn(store: Store, events: Sender<AppEvent>) -> (StoreHandle, StoreWorker) {
    let (tx, rx) = mpsc::channel();
    let thread = thread::spawn(move || run(store, rx, events));
    (StoreHandle { tx }, StoreWorker { thread })
}

fn run(store: Store, rx: Receiver<Request>, events: Sender<AppEvent>) {
    info!("store worker started");
    // Ends once every StoreHandle has been dropped
    for request in rx {
        match request {
            Request::Insert {
                exercise,
                weight,
                reps,
                date,
            } => {
                if let Err(e) = store.insert(&exercise, weight, reps, date) {
                    report(&events, format!("Could not save set for {exercise}: {e}"));
                }
            }
            Request::DeleteExercise(name) => {
                if let Err(e) = store.delete_by_exercise(&name) {
                    report(&events, format!("Could not delete {name}: {e}"));
                }
            }
            // A dropped reply receiver only means the caller went away
            Request::ListExercises(reply) => {
                let _ = reply.send(store.list_distinct_exercises());
            }
            Request::History(limit, reply) => {
                let _ = reply.send(store.query_history(limit));
            }
            Request::Bests(limit, reply) => {
                let _ = reply.send(store.query_bests(limit));
            }
            Request::SetsOn(date, reply) => {
                let _ = reply.send(store.sets_recorded_on(date));
            }
        }
    }
    info!("store worker stopped");
}

fn report(events: &Sender<AppEvent>, message: String) {
    error!("{message}");
    if events.send(AppEvent::StoreFailure(message)).is_err() {
        debug!("event loop gone, dropping store failure");
    }
}

impl StoreHandle {
    /// Queues one row. Returns once the request is queued, not once it is written.
    pub fn insert(
        &self,
        exercise: &str,
        weight: Option<u32>,
        reps: Option<u32>,
        date: Option<NaiveDate>,
    ) -> Result<(), Error> {
        self.submit(Request::Insert {
            exercise: exercise.to_string(),
            weight,
            reps,
            date,
        })
    }

    /// Queues removal of every row recorded for `name`.
    pub fn delete_by_exercise(&self, name: &str) -> Result<(), Error> {
        self.submit(Request::DeleteExercise(name.to_string()))
    }

    pub fn list_distinct_exercises(&self) -> Result<Vec<String>, Error> {
        self.ask(Request::ListExercises)
    }

    pub fn query_history(&self, limit: u32) -> Result<Vec<WorkoutEntry>, Error> {
        self.ask(|reply| Request::History(limit, reply))
    }

    pub fn query_bests(&self, limit: u32) -> Result<Vec<PersonalBest>, Error> {
        self.ask(|reply| Request::Bests(limit, reply))
    }

    pub fn sets_recorded_on(&self, date: NaiveDate) -> Result<Vec<WorkoutEntry>, Error> {
        self.ask(|reply| Request::SetsOn(date, reply))
    }

    fn submit(&self, request: Request) -> Result<(), Error> {
        self.tx.send(request).map_err(|_| Error::WorkerGone)
    }

    fn ask<T>(&self, build: impl FnOnce(Reply<T>) -> Request) -> Result<T, Error> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.submit(build(reply_tx))?;
        reply_rx.recv().map_err(|_| Error::WorkerGone)?
    }
}
