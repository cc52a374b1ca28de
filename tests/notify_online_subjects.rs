mod common;

use std::sync::Arc;
use std::time::Duration;

use calmdown::application::{
    AppError, BroadcastStrategy, Chain, CooldownStrategy, EventPublisher, OnlineGuard,
    RefreshEngine, strategy_fn,
};
use calmdown::domain::{CooldownEventKind, Subject, SubjectKey};
use calmdown::infrastructure::{
    event_bus::EventBus, memory_directory::InMemoryDirectory, message_action::MessageAction,
};
use calmdown::interfaces::config::Config;
use calmdown::interfaces::console::{Command, Console};
use tokio::time::advance;

use common::{RecordingNotifier, RecordingStrategy};

const SECOND: Duration = Duration::from_secs(1);

#[tokio::test(start_paused = true)]
async fn rejection_message_fills_placeholders() {
    let directory = InMemoryDirectory::new();
    let notifier = RecordingNotifier::new();
    let alice = Subject::named("alice");
    directory.join(alice.clone());

    let cooldown = RefreshEngine::default()
        .builder()
        .named("greet")
        .rejects_with(OnlineGuard::new(
            directory.clone(),
            MessageAction::new(
                vec!["%player%, wait %time%.".into(), "(%player%)".into()],
                Arc::new(notifier.clone()),
            ),
        ))
        .build();

    cooldown.put(alice.key, 65 * SECOND);
    assert!(!cooldown.test(alice.key).await.unwrap());

    assert_eq!(
        notifier.texts(),
        vec!["alice, wait 1 minute, and 5 seconds.", "(alice)"]
    );
    let notices = notifier.notices();
    assert_eq!(notices[0].cooldown, "greet");
    assert_eq!(notices[0].subject, alice);
}

#[tokio::test(start_paused = true)]
async fn offline_subjects_are_skipped() {
    let directory = InMemoryDirectory::new();
    let notifier = RecordingNotifier::new();
    let engine = RefreshEngine::default();
    let cooldown = engine
        .builder()
        .when_over(OnlineGuard::new(
            directory.clone(),
            MessageAction::new(vec!["%player% is free".into()], Arc::new(notifier.clone())),
        ))
        .build();
    let (alice, bob) = (Subject::named("alice"), Subject::named("bob"));
    directory.join(alice.clone());
    directory.join(bob.clone());

    cooldown.put(alice.key, SECOND);
    cooldown.put(bob.key, SECOND);
    engine.tick().await;

    directory.leave(&bob.key);
    advance(2 * SECOND).await;
    let report = engine.tick().await;

    assert_eq!(report.released, 2);
    assert_eq!(report.failures, 0);
    assert_eq!(notifier.texts(), vec!["alice is free"]);
}

#[tokio::test(start_paused = true)]
async fn expiry_message_reports_zero_time_left() {
    let directory = InMemoryDirectory::new();
    let notifier = RecordingNotifier::new();
    let engine = RefreshEngine::default();
    let cooldown = engine
        .builder()
        .when_over(OnlineGuard::new(
            directory.clone(),
            MessageAction::new(vec!["%time% left".into()], Arc::new(notifier.clone())),
        ))
        .build();
    let alice = Subject::named("alice");
    directory.join(alice.clone());

    cooldown.put(alice.key, SECOND);
    engine.tick().await;
    advance(SECOND).await;
    engine.tick().await;

    assert_eq!(notifier.texts(), vec!["0 seconds left"]);
}

#[tokio::test(start_paused = true)]
async fn events_are_published_on_the_bus() {
    let bus = EventBus::new(16);
    let mut events = bus.subscribe();
    let publisher: Arc<dyn EventPublisher> = Arc::new(bus);
    let engine = RefreshEngine::default();
    let cooldown = engine
        .builder()
        .named("trade")
        .rejects_with(BroadcastStrategy::rejections(publisher.clone()))
        .when_over(BroadcastStrategy::expiries(publisher))
        .build();
    let subject = SubjectKey::random();

    cooldown.put(subject, 10 * SECOND);
    engine.tick().await;
    advance(4 * SECOND).await;
    cooldown.test(subject).await.unwrap();

    let rejected = events.recv().await.unwrap();
    assert_eq!(rejected.cooldown, "trade");
    assert_eq!(rejected.subject, subject);
    assert_eq!(rejected.kind, CooldownEventKind::Rejected);
    assert_eq!(rejected.time_left, Some(6 * SECOND));

    advance(6 * SECOND).await;
    engine.tick().await;

    let expired = events.recv().await.unwrap();
    assert_eq!(expired.kind, CooldownEventKind::Expired);
    assert_eq!(expired.time_left, None);
}

#[tokio::test]
async fn chain_runs_every_strategy_and_keeps_the_error() {
    let first = RecordingStrategy::new();
    let last = RecordingStrategy::new();
    let strategies: Vec<Arc<dyn CooldownStrategy>> = vec![
        Arc::new(first.clone()),
        Arc::new(strategy_fn(|_, _| Err(AppError::Strategy("boom".into())))),
        Arc::new(last.clone()),
    ];
    let cooldown = RefreshEngine::default()
        .builder()
        .rejects_with(Chain::new(strategies))
        .build();
    let subject = SubjectKey::random();

    cooldown.put(subject, 60 * SECOND);
    let err = cooldown.test(subject).await.unwrap_err();

    assert!(matches!(err, AppError::Strategy(ref msg) if msg == "boom"));
    assert_eq!(first.count(), 1);
    assert_eq!(last.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn configured_cooldowns_message_and_expire() {
    let cfg = Config::from_yaml(
        r#"
tick_interval_ms: 500
cooldowns:
  - name: greet
    default_seconds: 30
    reject_messages: ["%player%, wait %time%"]
    expiry_messages: ["%player%, go ahead"]
  - name: quiet
    default_seconds: 5
"#,
    )
    .unwrap();
    let engine = RefreshEngine::new(cfg.engine_config().unwrap());
    let directory = InMemoryDirectory::new();
    let notifier = RecordingNotifier::new();

    let cooldowns = cfg.build_cooldowns(&engine, &directory, Arc::new(notifier.clone()), None);
    assert_eq!(engine.config().tick_interval(), Duration::from_millis(500));
    assert_eq!(engine.registered(), 1);
    assert!(!cooldowns["quiet"].has_rejection_strategy());

    let console = Console::new(cooldowns, directory);
    console.execute(Command::Join("alice".into())).await.unwrap();

    let used = console
        .execute(Command::Use {
            cooldown: "greet".into(),
            name: "alice".into(),
        })
        .await
        .unwrap();
    assert_eq!(used, "alice used greet");
    engine.tick().await;

    advance(10 * SECOND).await;
    let again = console
        .execute(Command::Use {
            cooldown: "greet".into(),
            name: "alice".into(),
        })
        .await
        .unwrap();
    assert_eq!(again, "alice is on greet for 20 seconds");

    advance(20 * SECOND).await;
    engine.tick().await;
    assert_eq!(
        notifier.texts(),
        vec!["alice, wait 20 seconds", "alice, go ahead"]
    );

    // no rejection strategy configured: using it is a configuration error
    assert!(
        console
            .execute(Command::Use {
                cooldown: "quiet".into(),
                name: "alice".into(),
            })
            .await
            .is_err()
    );
    assert!(
        console
            .execute(Command::Clear {
                cooldown: "missing".into(),
            })
            .await
            .is_err()
    );
}

#[tokio::test(start_paused = true)]
async fn console_reports_time_left_and_listing() {
    let cfg = Config::from_yaml("cooldowns: [{name: greet, default_seconds: 30}]").unwrap();
    let engine = RefreshEngine::new(cfg.engine_config().unwrap());
    let directory = InMemoryDirectory::new();
    let cooldowns = cfg.build_cooldowns(
        &engine,
        &directory,
        Arc::new(RecordingNotifier::new()),
        None,
    );
    let console = Console::new(cooldowns, directory);

    console.execute(Command::Join("bob".into())).await.unwrap();
    console
        .execute(Command::Put {
            cooldown: "greet".into(),
            name: "bob".into(),
            secs: Some(90),
        })
        .await
        .unwrap();

    let left = console
        .execute(Command::Left {
            cooldown: "greet".into(),
            name: "bob".into(),
        })
        .await
        .unwrap();
    assert_eq!(left, "bob: 1 minute, and 30 seconds left");

    let list = console.execute(Command::List).await.unwrap();
    assert_eq!(list, "cooldown greet: 1 active\nonline: bob");

    console
        .execute(Command::Release {
            cooldown: "greet".into(),
            name: "bob".into(),
        })
        .await
        .unwrap();
    let left = console
        .execute(Command::Left {
            cooldown: "greet".into(),
            name: "bob".into(),
        })
        .await
        .unwrap();
    assert_eq!(left, "bob is not on greet");
}
