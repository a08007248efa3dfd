use glam::Vec2;
use map_terrain::{Landmass, LandmassCache, LandmassConfig, ParamRange};
use std::sync::Arc;

fn perimeter(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n).map(|i| points[i].distance(points[(i + 1) % n])).sum()
}

#[test]
fn test_same_seed_is_byte_identical() {
    let config = LandmassConfig::default();
    for seed in ["torontopia", "", "a", "map-42", "🗺️ unicode seed"] {
        let a = Landmass::generate(seed, &config);
        let b = Landmass::generate(seed, &config);
        assert_eq!(a, b, "seed {seed:?}");
        assert_eq!(
            a.coastline.to_path().to_svg_path(),
            b.coastline.to_path().to_svg_path()
        );
        let bits = |l: &Landmass| -> Vec<u32> {
            l.coastline
                .outline
                .iter()
                .flat_map(|p| [p.x.to_bits(), p.y.to_bits()])
                .collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }
}

#[test]
fn test_independent_of_call_order() {
    let config = LandmassConfig::default();
    let first = Landmass::generate("harbour", &config);
    let _noise = Landmass::generate("something else", &config);
    let _more = Landmass::generate("and another", &config);
    let again = Landmass::generate("harbour", &config);
    assert_eq!(first, again);
}

#[test]
fn test_different_seeds_differ() {
    let config = LandmassConfig::default();
    let a = Landmass::generate("map-1", &config);
    let b = Landmass::generate("map-2", &config);
    assert_ne!(a.coastline.outline, b.coastline.outline);
}

#[test]
fn test_torontopia_scenario() {
    let config = LandmassConfig::default();
    let land = Landmass::generate("torontopia", &config);

    assert!(!land.coastline.outline.is_empty());
    assert!(!land.coastline.to_path().segments.is_empty());
    assert!(
        (1..=5).contains(&land.islands.len()),
        "islands: {}",
        land.islands.len()
    );
    assert!(land.islands.len() <= land.params.island_count);
    assert!(!land.lakes().is_empty());
    assert!(land.lakes().len() <= land.params.lake_count);
}

#[test]
fn test_point_count_follows_subdivisions() {
    let config = LandmassConfig::default();
    let land = Landmass::generate("counting", &config);
    let expected = land.params.base_points * (1 << land.params.subdivisions);
    assert_eq!(land.coastline.outline.len(), expected);
}

#[test]
fn test_islands_offshore_and_lakes_inland() {
    let config = LandmassConfig::default();
    for seed in ["torontopia", "islandia", "lakeshore", "peninsula"] {
        let land = Landmass::generate(seed, &config);
        for island in &land.islands {
            let centroid =
                island.outline.iter().copied().sum::<Vec2>() / island.outline.len() as f32;
            assert!(centroid.x > 0.0 && centroid.x < config.extent);
            assert!(centroid.y > 0.0 && centroid.y < config.extent);
        }
        for lake in land.lakes() {
            let centroid = lake.iter().copied().sum::<Vec2>() / lake.len() as f32;
            // Lake centers sit well inside the main body, so the even-odd
            // containment of the outline alone must hold.
            assert!(map_terrain::geometry::point_in_polygon(
                centroid,
                &land.coastline.outline
            ));
            assert!(!land.coastline.contains(centroid), "lake center is water");
        }
    }
}

#[test]
fn test_roughness_increases_coastline_length() {
    let smooth = LandmassConfig {
        roughness: ParamRange::new(0.05, 0.05),
        ..Default::default()
    };
    let rough = LandmassConfig {
        roughness: ParamRange::new(0.9, 0.9),
        ..Default::default()
    };

    let seeds: Vec<String> = (0..20).map(|i| format!("coast-{i}")).collect();
    let smooth_total: f32 = seeds
        .iter()
        .map(|s| perimeter(&Landmass::generate(s, &smooth).coastline.outline))
        .sum();
    let rough_total: f32 = seeds
        .iter()
        .map(|s| perimeter(&Landmass::generate(s, &rough).coastline.outline))
        .sum();
    assert!(rough_total > smooth_total);
}

#[test]
fn test_zero_attempts_skips_blobs() {
    let config = LandmassConfig {
        max_attempts: 0,
        ..Default::default()
    };
    let land = Landmass::generate("no room", &config);
    assert!(land.islands.is_empty());
    assert!(land.lakes().is_empty());
    assert!(!land.coastline.outline.is_empty());
}

#[test]
fn test_cache_reuses_entries() {
    let mut cache = LandmassCache::new(LandmassConfig::default());
    let a = cache.get("torontopia");
    let b = cache.get("torontopia");
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);

    let _ = cache.get("elsewhere");
    assert_eq!(cache.len(), 2);

    // Same config keeps entries.
    cache.set_config(LandmassConfig::default());
    assert_eq!(cache.len(), 2);

    cache.set_config(LandmassConfig {
        max_attempts: 5,
        ..Default::default()
    });
    assert!(cache.is_empty());
}

#[test]
fn test_config_json_round_trip() {
    let config = LandmassConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let back: LandmassConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, back);

    let partial: LandmassConfig = serde_json::from_str(r#"{"max_attempts": 3}"#).unwrap();
    assert_eq!(partial.max_attempts, 3);
    assert_eq!(partial.island_count, LandmassConfig::default().island_count);
}
