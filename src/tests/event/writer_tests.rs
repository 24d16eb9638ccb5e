//! Tests for the EventWriter queue, envelope and progress reports.

use tokio::sync::mpsc;

use crate::{
    AsyncInMemorySink, AsyncOutputTarget, Event, EventWriter, EventWrittenProgressReport,
    ProgressKind, Severity, WriterError,
};

struct Harness {
    writer: EventWriter,
    stdout: AsyncInMemorySink,
    stderr: AsyncInMemorySink,
    progress: mpsc::UnboundedReceiver<EventWrittenProgressReport>,
}

async fn harness(capacity: Option<usize>) -> Harness {
    let stdout = AsyncInMemorySink::new("stdout");
    let stderr = AsyncInMemorySink::new("stderr");
    let (tx, progress) = mpsc::unbounded_channel();
    let writer = EventWriter::builder(
        stdout.open_append().await.unwrap(),
        stderr.open_append().await.unwrap(),
    )
    .with_capacity(capacity)
    .with_progress(tx)
    .build();
    Harness {
        writer,
        stdout,
        stderr,
        progress,
    }
}

fn drain(progress: &mut mpsc::UnboundedReceiver<EventWrittenProgressReport>) -> Vec<EventWrittenProgressReport> {
    let mut reports = Vec::new();
    while let Ok(report) = progress.try_recv() {
        reports.push(report);
    }
    reports
}

fn data_values(stdout: &str) -> Vec<String> {
    stdout
        .split("<data>")
        .skip(1)
        .map(|rest| rest.split("</data>").next().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn no_events_means_no_envelope() {
    let mut h = harness(None).await;
    h.writer.complete().await.unwrap();

    assert_eq!(h.stdout.contents_string(), "");
    let reports = drain(&mut h.progress);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].kind, ProgressKind::WriterCompleted);
    assert!(reports[0].written_event.is_empty());
}

#[tokio::test]
async fn single_producer_order_is_preserved() {
    let mut h = harness(None).await;
    for i in 0..3 {
        h.writer.queue_event(Event::new(format!("e{i}"))).await.unwrap();
    }
    h.writer.complete().await.unwrap();

    assert_eq!(
        h.stdout.contents_string(),
        "<stream>\
         <event><data>e0</data></event>\
         <event><data>e1</data></event>\
         <event><data>e2</data></event>\
         </stream>"
    );

    let reports = drain(&mut h.progress);
    let kinds: Vec<_> = reports.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ProgressKind::EventWritten,
            ProgressKind::EventWritten,
            ProgressKind::EventWritten,
            ProgressKind::StreamClosed,
            ProgressKind::WriterCompleted,
        ]
    );
    let written: Vec<_> = reports[..3]
        .iter()
        .map(|r| r.written_event.data.clone().unwrap())
        .collect();
    assert_eq!(written, vec!["e0", "e1", "e2"]);
    assert!(reports[3].written_event.is_empty());
    assert!(reports[4].written_event.is_empty());
}

#[tokio::test]
async fn completing_twice_is_a_no_op() {
    let mut h = harness(None).await;
    h.writer.queue_event(Event::new("only")).await.unwrap();

    let (first, second) = tokio::join!(h.writer.complete(), h.writer.complete());
    first.unwrap();
    second.unwrap();
    h.writer.complete().await.unwrap();

    let out = h.stdout.contents_string();
    assert_eq!(out.matches("</stream>").count(), 1);
    let completed = drain(&mut h.progress)
        .into_iter()
        .filter(|r| r.kind == ProgressKind::WriterCompleted)
        .count();
    assert_eq!(completed, 1);
    assert!(h.writer.is_completed());
}

#[tokio::test]
async fn queue_and_log_after_completion_fail() {
    let h = harness(None).await;
    h.writer.complete().await.unwrap();

    let queued = h.writer.queue_event(Event::new("late")).await;
    assert!(matches!(queued, Err(WriterError::Completed)));

    let logged = h.writer.log(Severity::Info, "late").await;
    assert!(matches!(logged, Err(WriterError::Completed)));
    assert_eq!(h.stdout.contents_string(), "");
}

#[tokio::test]
async fn log_writes_one_line_per_call() {
    let h = harness(None).await;
    h.writer.log(Severity::Warn, "disk almost full").await.unwrap();
    h.writer.log(Severity::Fatal, "gone").await.unwrap();
    h.writer.complete().await.unwrap();

    assert_eq!(h.stderr.contents_string(), "WARN disk almost full\nFATAL gone\n");
    assert_eq!(h.stdout.contents_string(), "");
}

#[tokio::test]
async fn stop_truncates_the_stream_and_closes_it() {
    let mut h = harness(None).await;
    h.writer.queue_event(Event::new("first")).await.unwrap();

    let report = h.progress.recv().await.unwrap();
    assert_eq!(report.kind, ProgressKind::EventWritten);

    h.writer.stop_writing_events();
    assert!(h.writer.is_stopped());
    h.writer.queue_event(Event::new("second")).await.unwrap();
    h.writer.queue_event(Event::new("third")).await.unwrap();
    h.writer.complete().await.unwrap();

    let out = h.stdout.contents_string();
    assert!(out.starts_with("<stream>"));
    assert!(out.ends_with("</stream>"));
    assert_eq!(data_values(&out), vec!["first"]);

    let kinds: Vec<_> = drain(&mut h.progress).into_iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![ProgressKind::StreamClosed, ProgressKind::WriterCompleted]);
}

#[tokio::test]
async fn stop_before_first_event_writes_nothing() {
    let h = harness(None).await;
    h.writer.stop_writing_events();
    h.writer.queue_event(Event::new("ignored")).await.unwrap();
    h.writer.complete().await.unwrap();

    assert_eq!(h.stdout.contents_string(), "");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_producers_keep_their_own_order() {
    let h = harness(None).await;

    let mut producers = Vec::new();
    for p in 0..4 {
        let writer = h.writer.clone();
        producers.push(tokio::spawn(async move {
            for n in 0..25 {
                writer.queue_event(Event::new(format!("p{p}-{n}"))).await.unwrap();
            }
        }));
    }
    for producer in producers {
        producer.await.unwrap();
    }
    h.writer.complete().await.unwrap();

    let values = data_values(&h.stdout.contents_string());
    assert_eq!(values.len(), 100);
    for p in 0..4 {
        let prefix = format!("p{p}-");
        let seen: Vec<u32> = values
            .iter()
            .filter_map(|v| v.strip_prefix(&prefix))
            .map(|n| n.parse().unwrap())
            .collect();
        assert_eq!(seen, (0..25).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn bounded_queue_writes_everything() {
    let h = harness(Some(1)).await;
    for i in 0..20 {
        h.writer.queue_event(Event::new(i.to_string())).await.unwrap();
    }
    h.writer.complete().await.unwrap();

    let expected: Vec<String> = (0..20).map(|i| i.to_string()).collect();
    assert_eq!(data_values(&h.stdout.contents_string()), expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn accepted_events_survive_a_racing_complete() {
    for _ in 0..200 {
        let h = harness(None).await;
        let producer = {
            let writer = h.writer.clone();
            tokio::spawn(async move { writer.queue_event(Event::new("raced")).await.is_ok() })
        };
        let completer = {
            let writer = h.writer.clone();
            tokio::spawn(async move { writer.complete().await })
        };

        let accepted = producer.await.unwrap();
        completer.await.unwrap().unwrap();

        let written = data_values(&h.stdout.contents_string()).len();
        assert_eq!(written, usize::from(accepted));
    }
}
