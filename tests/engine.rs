//! Update detection engine tests against an in-memory registry

mod helper;

use std::sync::Arc;
use std::time::{Duration, Instant};

use helmfile_updates::check::{CheckOptions, UpdateChecker};
use helmfile_updates::manifest::Release;
use helmfile_updates::version::error::RegistryError;
use helmfile_updates::version::semver::CompareResult;

use helper::FakeRegistry;

fn releases(count: usize) -> Vec<Release> {
    (0..count)
        .map(|i| Release::new(&format!("app-{i}"), &format!("repo/app-{i}"), "1.0.0"))
        .collect()
}

fn registry_for(releases: &[Release], latest: &str) -> FakeRegistry {
    releases.iter().fold(FakeRegistry::new(), |registry, release| {
        registry.with_chart(&release.chart, vec![(release.chart.as_str(), latest)])
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn preserves_manifest_order_when_completion_order_is_reversed() {
    let releases = releases(5);
    let registry = releases
        .iter()
        .enumerate()
        .fold(registry_for(&releases, "1.1.0"), |registry, (i, release)| {
            registry.with_delay(&release.chart, Duration::from_millis(40 * (5 - i) as u64))
        });

    let checker = UpdateChecker::new(Arc::new(registry));
    let (set, failures) = checker.run(&releases).await;

    assert!(failures.is_none());
    let names: Vec<_> = set.iter().map(|c| c.name().to_string()).collect();
    let expected: Vec<_> = releases.iter().map(|r| r.name.clone()).collect();
    assert_eq!(names, expected);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_lookup_leaves_gap_at_its_index() {
    let releases = releases(4);
    let registry = registry_for(&releases, "1.2.0").with_failure("repo/app-2", "exit status 1");

    let checker = UpdateChecker::new(Arc::new(registry));
    let (set, failures) = checker.run(&releases).await;

    assert_eq!(set.len(), 4);
    assert_eq!(set.iter().count(), 3);
    assert_eq!(set.gaps(), vec![2]);
    assert!(set.has_updates());

    let failures = failures.expect("expected lookup failures");
    assert_eq!(failures.releases(), vec!["app-2"]);
    assert_eq!(failures.failures()[0].index, 2);
    assert!(failures.to_string().contains("app-2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unparseable_version_does_not_affect_other_releases() {
    let releases = vec![
        Release::new("bad", "repo/bad", "not-a-version"),
        Release::new("ok", "repo/ok", "1.0.0"),
    ];
    let registry = FakeRegistry::new()
        .with_chart("repo/bad", vec![("repo/bad", "1.1.0")])
        .with_chart("repo/ok", vec![("repo/ok", "1.1.0")]);

    let checker = UpdateChecker::new(Arc::new(registry));
    let (set, failures) = checker.run(&releases).await;

    assert!(failures.is_none());
    assert!(set.slots().iter().all(Option::is_some));

    let bad = set.get(0).unwrap();
    assert_eq!(bad.name(), "bad");
    assert_eq!(bad.status(), CompareResult::Invalid);
    assert!(!bad.has_update());

    let ok = set.get(1).unwrap();
    assert_eq!(ok.name(), "ok");
    assert!(ok.has_update());

    assert!(set.has_updates());
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_chart_is_reported_as_not_found() {
    let releases = vec![Release::new("ghost", "repo/ghost", "1.0.0")];

    let checker = UpdateChecker::new(Arc::new(FakeRegistry::new()));
    let (set, failures) = checker.run(&releases).await;

    assert_eq!(set.gaps(), vec![0]);
    let failures = failures.unwrap();
    assert!(matches!(
        failures.failures()[0].source,
        RegistryError::NotFound(_)
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn starts_every_lookup_at_once_by_default() {
    let releases = releases(6);
    let registry = Arc::new(registry_for(&releases, "1.0.0").with_barrier(6));

    let checker = UpdateChecker::new(registry.clone());
    let (set, failures) = tokio::time::timeout(Duration::from_secs(5), checker.run(&releases))
        .await
        .expect("lookups did not run concurrently");

    assert!(failures.is_none());
    assert_eq!(set.iter().count(), 6);
    assert_eq!(registry.peak_in_flight(), 6);
}

#[tokio::test(flavor = "multi_thread")]
async fn max_concurrency_bounds_lookups_in_flight() {
    let releases = releases(6);
    let registry = releases
        .iter()
        .fold(registry_for(&releases, "1.0.0"), |registry, release| {
            registry.with_delay(&release.chart, Duration::from_millis(30))
        });
    let registry = Arc::new(registry);

    let checker = UpdateChecker::new(registry.clone()).with_options(CheckOptions {
        max_concurrency: Some(2),
        ..CheckOptions::default()
    });
    let (set, failures) = checker.run(&releases).await;

    assert!(failures.is_none());
    assert_eq!(set.iter().count(), 6);
    assert!(registry.peak_in_flight() <= 2);
    assert_eq!(registry.searched().len(), 6);
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_lookup_times_out_without_affecting_others() {
    let releases = releases(3);
    let registry =
        registry_for(&releases, "1.1.0").with_delay("repo/app-1", Duration::from_secs(10));

    let checker = UpdateChecker::new(Arc::new(registry)).with_options(CheckOptions {
        lookup_timeout: Some(Duration::from_millis(100)),
        max_concurrency: None,
    });

    let started = Instant::now();
    let (set, failures) = checker.run(&releases).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(set.gaps(), vec![1]);
    let failures = failures.unwrap();
    assert!(matches!(
        failures.failures()[0].source,
        RegistryError::Timeout { .. }
    ));
    assert!(set.get(0).unwrap().has_update());
    assert!(set.get(2).unwrap().has_update());
}

#[tokio::test(flavor = "multi_thread")]
async fn repeated_runs_yield_identical_results() {
    let mut releases = releases(3);
    releases.push(Release::new("local", "../charts/local", "0.1.0"));
    let registry = registry_for(&releases, "v1.3.0").with_failure("repo/app-0", "boom");

    let checker = UpdateChecker::new(Arc::new(registry));
    let (first, first_failures) = checker.run(&releases).await;
    let (second, second_failures) = checker.run(&releases).await;

    assert_eq!(first, second);
    assert_eq!(
        first_failures.unwrap().releases(),
        second_failures.unwrap().releases()
    );
}

#[tokio::test]
async fn refresh_index_delivers_progress_in_order() {
    let registry = FakeRegistry::new().with_progress(vec![
        "Hang tight while we grab the latest from your chart repositories...",
        "...Successfully got an update from the \"bitnami\" chart repository",
        "Update Complete.",
    ]);

    let mut lines = Vec::new();
    UpdateChecker::new(Arc::new(registry))
        .refresh_index(|line| lines.push(line.to_string()))
        .await
        .unwrap();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Hang tight"));
    assert_eq!(lines[2], "Update Complete.");
}
