use std::{
    convert::Infallible,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Barrier, Mutex,
    },
    thread,
    time::Duration,
};

use manufactory::{Component, ComposeError, GetError, Manufactory};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("manufactory=debug")
        .with_test_writer()
        .try_init();
}

#[derive(Debug)]
struct Logger;
#[derive(Debug)]
struct Storage {
    logger: Arc<Logger>,
}
struct Service {
    storage: Arc<Storage>,
}

type Journal = Arc<Mutex<Vec<&'static str>>>;

fn layered(journal: &Journal) -> Component {
    let (logger, storage, service) = (journal.clone(), journal.clone(), journal.clone());

    Component::accumulator("layered")
        .add_retained_factory(move |storage: Arc<Storage>| {
            service.lock().unwrap().push("service");
            Ok::<_, Infallible>(Service { storage })
        })
        .add_retained_factory(move |logger: Arc<Logger>| {
            storage.lock().unwrap().push("storage");
            Ok::<_, Infallible>(Storage { logger })
        })
        .add_retained_factory(move || {
            logger.lock().unwrap().push("logger");
            Ok::<_, Infallible>(Logger)
        })
        .build()
        .unwrap()
}

#[test]
fn dependencies_are_constructed_once_in_order() {
    init_tracing();
    let journal = Journal::default();

    let manufactory = Manufactory::<(Service,)>::create(&layered(&journal)).unwrap();
    assert!(journal.lock().unwrap().is_empty());

    let first: Arc<Service> = manufactory.get().unwrap();
    let second: Arc<Service> = manufactory.get().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(
        &first.storage.logger,
        &manufactory.runtime().get::<Logger>().unwrap()
    ));
    assert_eq!(*journal.lock().unwrap(), vec!["logger", "storage", "service"]);
}

#[test]
fn concurrent_first_requests_construct_once() {
    init_tracing();
    const THREADS: usize = 8;

    let constructed = Arc::new(AtomicUsize::new(0));
    let counter = constructed.clone();

    let manufactory = Manufactory::<(Storage,)>::compose(
        Component::accumulator("contended")
            .add_instance(Logger)
            .add_retained_factory(move |logger: Arc<Logger>| {
                counter.fetch_add(1, Ordering::SeqCst);
                // Widen the window for racing requests
                thread::sleep(Duration::from_millis(20));
                Ok::<_, Infallible>(Storage { logger })
            }),
    )
    .unwrap();

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let manufactory = manufactory.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                manufactory.get::<Storage, _>().unwrap()
            })
        })
        .collect();

    let results: Vec<Arc<Storage>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    assert!(results.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[test]
fn subset_facades_observe_constructed_singletons() {
    init_tracing();
    let journal = Journal::default();

    let manufactory =
        Manufactory::<(Logger, Storage, Service)>::create(&layered(&journal)).unwrap();
    let _: Arc<Service> = manufactory.get().unwrap();

    let storage_only = manufactory.create_subset_manufactory::<(Storage,), _>();
    let storage: Arc<Storage> = storage_only.get().unwrap();
    let service: Arc<Service> = manufactory.get().unwrap();

    assert!(Arc::ptr_eq(&storage, &service.storage));
    assert_eq!(journal.lock().unwrap().len(), 3);
}

#[test]
fn circular_dependencies_fail_composition() {
    init_tracing();
    struct Chicken;
    struct Egg;

    let result = Manufactory::<(Chicken,)>::compose(
        Component::accumulator("farm")
            .add_retained_factory(|_: Arc<Egg>| Ok::<_, Infallible>(Chicken))
            .add_retained_factory(|_: Arc<Chicken>| Ok::<_, Infallible>(Egg)),
    );

    match result {
        Err(ComposeError::Incomplete(errors)) => {
            assert!(errors.has_cycle());
            assert!(errors.to_string().contains("Circular Dependency"));
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[test]
fn cycles_outside_the_exports_fail_composition() {
    init_tracing();
    struct Chicken;
    struct Egg;
    struct Farm;

    let result = Manufactory::<(Farm,)>::compose(
        Component::accumulator("farm")
            .add_instance(Farm)
            .add_retained_factory(|_: Arc<Egg>| Ok::<_, Infallible>(Chicken))
            .add_retained_factory(|_: Arc<Chicken>| Ok::<_, Infallible>(Egg)),
    );

    match result {
        Err(ComposeError::Incomplete(errors)) => assert!(errors.has_cycle()),
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[test]
fn transients_rebuild_transients_and_share_singletons() {
    init_tracing();
    struct Session;
    struct Request;
    struct Handler {
        request: Arc<Request>,
        session: Arc<Session>,
    }

    let sessions = Arc::new(AtomicUsize::new(0));
    let counter = sessions.clone();

    let manufactory = Manufactory::<(Handler,)>::compose(
        Component::accumulator("handling")
            .add_retained_factory(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(Session)
            })
            .add_transient_factory(|| Ok::<_, Infallible>(Request))
            .add_transient_factory(|request: Arc<Request>, session: Arc<Session>| {
                Ok::<_, Infallible>(Handler { request, session })
            }),
    )
    .unwrap();

    let first: Arc<Handler> = manufactory.get().unwrap();
    let second: Arc<Handler> = manufactory.get().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&first.request, &second.request));
    assert!(Arc::ptr_eq(&first.session, &second.session));
    assert_eq!(sessions.load(Ordering::SeqCst), 1);
}

#[test]
fn failing_factories_only_fail_their_request() {
    init_tracing();

    #[derive(Debug, thiserror::Error)]
    #[error("disk unavailable")]
    struct DiskUnavailable;

    let manufactory = Manufactory::<(Logger, Storage)>::compose(
        Component::accumulator("broken")
            .add_retained_factory(|| Ok::<_, Infallible>(Logger))
            .add_retained_factory(|_: Arc<Logger>| Err::<Storage, _>(DiskUnavailable)),
    )
    .unwrap();

    let error = manufactory.get::<Storage, _>().unwrap_err();
    assert!(matches!(error, GetError::FactoryFailed { .. }));
    assert!(error.to_string().contains("disk unavailable"));

    assert!(manufactory.get::<Logger, _>().is_ok());
    assert!(manufactory.runtime().is_constructed::<Logger>());
}

#[test]
fn optional_dependencies_resolve_to_none_when_absent() {
    init_tracing();
    struct Metrics;
    struct Reporter {
        metrics: Option<Arc<Metrics>>,
    }

    let manufactory = Manufactory::<(Reporter,)>::compose(
        Component::accumulator("reporting").add_retained_factory(
            |metrics: Option<Arc<Metrics>>| Ok::<_, Infallible>(Reporter { metrics }),
        ),
    )
    .unwrap();

    let reporter: Arc<Reporter> = manufactory.get().unwrap();
    assert!(reporter.metrics.is_none());
}
