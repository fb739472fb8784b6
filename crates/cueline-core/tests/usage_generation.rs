use cueline_core::{
    Engine, EngineError, generate_usages,
    fixtures::{demo_engine, demo_session},
    model::{Region, RegionUsage, SortKey, Track, TrackKind, UsageConfig},
    parse::parse_session,
};

fn projection(usages: &[RegionUsage]) -> Vec<(String, Vec<String>, u64, u64)> {
    usages
        .iter()
        .map(|usage| {
            (
                usage.name.clone(),
                usage.original_names.clone(),
                usage.length,
                usage.first_frame,
            )
        })
        .collect()
}

#[test]
fn headerless_lines_become_usage_entries_with_stripped_names() {
    let text = "00:01:35:24\t01 Hijack.mp3\n00:00:20:11\t07 Chico's Groove.mp3\n";
    let session = parse_session(text, "bare.txt").expect("export should parse");
    let config = UsageConfig {
        strip_extension_suffix: true,
        ..UsageConfig::default()
    };
    let engine = Engine::from_session(session, config);

    let usages = engine.usages();
    assert_eq!(usages.len(), 2);
    assert_eq!(usages[0].name, "07 Chico's Groove");
    assert_eq!(usages[0].length, 2_399 - 511);
    assert_eq!(usages[1].name, "01 Hijack");
    assert_eq!(usages[1].length, 0);
}

#[test]
fn identical_reduced_names_merge_and_keep_raw_provenance() {
    let tracks = vec![Track::new("Main")];
    let regions = vec![
        Region::new("Theme.wav", "Main", 0, 100, true),
        Region::new("Theme.wav", "Main", 200, 250, true),
    ];
    let config = UsageConfig {
        strip_extension_suffix: true,
        ..UsageConfig::default()
    };

    let usages = generate_usages(&regions, &tracks, &config);
    assert_eq!(usages.len(), 1);
    assert_eq!(usages[0].name, "Theme");
    assert_eq!(usages[0].length, 150);
    assert_eq!(usages[0].original_names, vec!["Theme.wav", "Theme.wav"]);
    assert_eq!(usages[0].first_frame, 0);
}

#[test]
fn every_usage_length_is_the_sum_of_its_source_regions() {
    let session = demo_session();
    let config = UsageConfig::default();
    let usages = generate_usages(&session.regions, &session.tracks, &config);

    for usage in &usages {
        let expected: u64 = usage
            .original_names
            .iter()
            .filter_map(|name| {
                session
                    .regions
                    .iter()
                    .find(|region| &region.name == name)
                    .map(|region| region.length)
            })
            .sum();
        assert_eq!(usage.length, expected, "sum invariant broke for {}", usage.name);
    }

    let total_usages: u64 = usages.iter().map(|usage| usage.length).sum();
    let total_regions: u64 = session.regions.iter().map(|region| region.length).sum();
    assert_eq!(total_usages, total_regions);
}

#[test]
fn short_regions_never_reach_the_output_when_filtered() {
    let engine = demo_engine(UsageConfig {
        ignore_shorter_than: 1_000,
        ..UsageConfig::default()
    });

    let usages = engine.usages();
    assert!(usages.iter().all(|usage| usage.length >= 1_000));
    assert!(
        usages
            .iter()
            .flat_map(|usage| &usage.original_names)
            .all(|name| name != "Fade 3" && name != "Lives In The Balance.mp3")
    );
}

#[test]
fn fade_regions_are_excluded_when_ignore_fade_is_set() {
    let engine = demo_engine(UsageConfig {
        ignore_fade: true,
        ..UsageConfig::default()
    });
    assert!(
        engine
            .usages()
            .iter()
            .all(|usage| !usage.name.to_lowercase().starts_with("fade"))
    );
    assert_eq!(engine.usages().len(), 5);
}

#[test]
fn similar_names_merge_to_a_fixed_point_and_conserve_length() {
    let tracks = vec![Track::new("Main")];
    let regions = vec![
        Region::new("Main Theme-01.wav", "Main", 0, 100, true),
        Region::new("Main Theme-02.wav", "Main", 300, 500, true),
        Region::new("Completely Different", "Main", 700, 750, true),
    ];
    let total: u64 = regions.iter().map(|region| region.length).sum();

    let config = UsageConfig {
        strip_extension_suffix: true,
        combine_similar: true,
        ..UsageConfig::default()
    };
    let usages = generate_usages(&regions, &tracks, &config);

    assert_eq!(usages.len(), 2);
    let merged = &usages[0];
    assert_eq!(merged.name, "Main Theme-01");
    assert_eq!(merged.length, 300);
    assert_eq!(
        merged.original_names,
        vec!["Main Theme-01.wav", "Main Theme-02.wav"]
    );

    let after: u64 = usages.iter().map(|usage| usage.length).sum();
    assert_eq!(after, total);
}

#[test]
fn generation_is_idempotent_for_unchanged_inputs() {
    let session = demo_session();
    let config = UsageConfig {
        strip_extension_suffix: true,
        combine_similar: true,
        sort_key: SortKey::ByName,
        ..UsageConfig::default()
    };

    let first = generate_usages(&session.regions, &session.tracks, &config);
    let second = generate_usages(&session.regions, &session.tracks, &config);
    assert_eq!(projection(&first), projection(&second));
}

#[test]
fn selection_range_clips_non_overlapping_regions() {
    let mut engine = demo_engine(UsageConfig::default());
    engine.set_selection_range(0, 300);

    let names: Vec<&str> = engine.usages().iter().map(|usage| usage.name.as_str()).collect();
    assert_eq!(names, vec!["Fade 3", "Isabelle Comes Back.mp3"]);

    // Degenerate window disables clipping.
    engine.set_selection_range(0, 0);
    assert_eq!(engine.usages().len(), 6);
}

#[test]
fn deselected_tracks_contribute_nothing() {
    let mut engine = demo_engine(UsageConfig::default());
    engine
        .select_track("M1 (Stereo)", false)
        .expect("track should exist");

    assert_eq!(engine.usages().len(), 3);
    assert!(
        engine
            .usages()
            .iter()
            .all(|usage| usage.name != "01 Hijack.mp3")
    );

    engine.select_all_tracks(false);
    assert!(engine.usages().is_empty());

    engine.select_tracks_of_kind(TrackKind::Stereo, true);
    assert_eq!(engine.usages().len(), 3);
    assert!(
        engine
            .usages()
            .iter()
            .any(|usage| usage.name == "01 Hijack.mp3")
    );
}

#[test]
fn unknown_track_selection_is_an_error() {
    let mut engine = demo_engine(UsageConfig::default());
    assert_eq!(
        engine.select_track("No Such Track", true),
        Err(EngineError::TrackNotFound("No Such Track".to_string()))
    );
}

#[test]
fn sort_toggles_between_name_and_first_frame_order() {
    let mut engine = demo_engine(UsageConfig {
        sort_key: SortKey::ByFirstFrame,
        ..UsageConfig::default()
    });
    let by_time: Vec<&str> = engine.usages().iter().map(|usage| usage.name.as_str()).collect();
    assert_eq!(
        by_time,
        vec![
            "Fade 3",
            "Isabelle Comes Back.mp3",
            "01 Hijack.mp3",
            "Lives In The Balance.mp3",
            "07 Chico's Groove.mp3",
            "16 Track 16.aif",
        ]
    );

    engine.configure(UsageConfig {
        sort_key: SortKey::ByName,
        ..UsageConfig::default()
    });
    let by_name: Vec<&str> = engine.usages().iter().map(|usage| usage.name.as_str()).collect();
    assert_eq!(
        by_name,
        vec![
            "01 Hijack.mp3",
            "07 Chico's Groove.mp3",
            "16 Track 16.aif",
            "Fade 3",
            "Isabelle Comes Back.mp3",
            "Lives In The Balance.mp3",
        ]
    );
}
