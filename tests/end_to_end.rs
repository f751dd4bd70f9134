//! Offline end-to-end flows through the public service API.

use genmap::{panels::Panel, service::ClimateService, Config, Variant};

fn offline_config(seed: u64) -> Config {
    let mut config = Config::default();
    config.offline = true;
    config.seed = seed;
    config
}

#[tokio::test]
async fn paris_query_selects_the_paris_city_model() {
    let service = ClimateService::new(offline_config(42));
    let session = service.load_location("Paris").await.expect("load applies");

    let city = session.city_model.expect("Paris is in the catalog");
    assert_eq!(city.name, "Paris");
    assert!(city.bounds.contains(session.location.lat, session.location.lng));
    assert_eq!(city.landmarks[0].name, "Tour Eiffel");
    assert!(session.notice.is_none());
}

#[tokio::test]
async fn unresolvable_query_falls_back_to_demo_data() {
    let service = ClimateService::new(offline_config(42));
    let session = service
        .load_location("Ocean View, Nowhere")
        .await
        .expect("load applies");

    assert_eq!(session.location.name, "New York City");
    assert_eq!(session.city_model.expect("default sits in NYC box").name, "New York");
    let notice = session.notice.expect("fallback surfaces a notice");
    assert!(notice.contains("Ocean View, Nowhere"));
    assert!(session.weather.is_estimated);
    // Estimated weather with no air quality: 45 - 10.
    assert_eq!(session.confidence, 35);
}

#[tokio::test]
async fn every_load_produces_a_complete_renderable_session() {
    let service = ClimateService::new(offline_config(7));
    for query in ["London", "new york", "Atlantis"] {
        let session = service.load_location(query).await.expect("load applies");
        assert_eq!(session.projections.records.len(), 16);
        let reports = service.render_panels(&session, 2075);
        assert_eq!(reports.len(), 4);
        for report in &reports {
            assert!(!report.metrics.is_empty(), "{} panel is empty", report.panel);
        }
    }
}

#[tokio::test]
async fn standard_variant_skips_the_synthetic_panels() {
    let mut config = offline_config(7);
    config.variant = Variant::Standard;
    let service = ClimateService::new(config);
    let session = service.load_location("London").await.unwrap();
    let reports = service.render_panels(&session, 2024);
    let panels: Vec<Panel> = reports.iter().map(|r| r.panel).collect();
    assert_eq!(panels, vec![Panel::CurrentWeather, Panel::ClimateProjections]);
}

#[tokio::test]
async fn identical_seeds_reproduce_identical_sessions() {
    let service_a = ClimateService::new(offline_config(1234));
    let service_b = ClimateService::new(offline_config(1234));
    let session_a = service_a.load_location("London").await.unwrap();
    let session_b = service_b.load_location("London").await.unwrap();

    assert_eq!(session_a.weather.temperature, session_b.weather.temperature);
    assert_eq!(session_a.projections.coastal, session_b.projections.coastal);
    for (ra, rb) in session_a
        .projections
        .records
        .iter()
        .zip(&session_b.projections.records)
    {
        assert_eq!(ra.temperature_increase, rb.temperature_increase);
    }

    let panels_a = service_a.render_panels(&session_a, 2099);
    let panels_b = service_b.render_panels(&session_b, 2099);
    for (pa, pb) in panels_a.iter().zip(&panels_b) {
        for (ma, mb) in pa.metrics.iter().zip(&pb.metrics) {
            assert_eq!(ma.value, mb.value);
            assert_eq!(ma.severity, mb.severity);
        }
    }
}
