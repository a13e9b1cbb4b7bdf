use super::*;

fn rx0() -> Selection {
    Selection::default()
}

fn select(receiver: u8, sub_receiver: u8) -> Selection {
    Selection {
        receiver: ReceiverId(receiver),
        sub_receiver: SubReceiverId(sub_receiver),
    }
}

/// Roughly the state a TCI server reports right after connecting.
fn tuned_cache(dds: i64, if0: i64, if1: i64) -> ParameterCache {
    let cache = ParameterCache::new();
    for rx in [0, 1] {
        cache.update(
            ParamName::Dds,
            Some(ReceiverId(rx)),
            None,
            Value::Int(dds),
        );
        cache.update(
            ParamName::If,
            Some(ReceiverId(rx)),
            Some(SubReceiverId(0)),
            Value::Int(if0),
        );
        cache.update(
            ParamName::If,
            Some(ReceiverId(rx)),
            Some(SubReceiverId(1)),
            Value::Int(if1),
        );
    }
    cache.update(ParamName::IfLimits, None, None, Value::Pair(-48_000, 48_000));
    cache
}

fn with_filter(cache: &ParameterCache, mode: &str, low: i64, high: i64) {
    cache.update(
        ParamName::Modulation,
        Some(ReceiverId(0)),
        None,
        Value::Text(mode.into()),
    );
    cache.update(
        ParamName::RxFilterBand,
        Some(ReceiverId(0)),
        None,
        Value::Pair(low, high),
    );
}

fn cmd(name: ParamName, receiver: u8, sub_receiver: u8, value: Value) -> WriteCommand {
    WriteCommand::new(
        name,
        ReceiverId(receiver),
        SubReceiverId(sub_receiver),
        value,
    )
}

fn resolve(
    cache: &ParameterCache,
    selection: Selection,
    action: Action,
    value: EventValue,
) -> Vec<WriteCommand> {
    let bands = BandTable::default();
    Resolver::new(cache, &bands, selection)
        .resolve(&action, value)
        .expect("resolve")
}

#[test]
fn band_scroll_moves_between_adjacent_breakpoints() {
    let bands = BandTable::default();
    for pair in bands.points().windows(2) {
        let (low, high) = (pair[0], pair[1]);
        let cache = tuned_cache(low, 1, 0);

        let up = resolve(&cache, rx0(), Action::BandScroll, EventValue::ScrollUp);
        assert_eq!(
            up,
            vec![
                cmd(ParamName::Dds, 0, 0, Value::Int(high)),
                cmd(ParamName::If, 0, 0, Value::Int(0)),
            ]
        );

        let cache = tuned_cache(high, -1, 0);
        let down = resolve(&cache, rx0(), Action::BandScroll, EventValue::ScrollDown);
        assert_eq!(down[0], cmd(ParamName::Dds, 0, 0, Value::Int(low)));
        assert_eq!(down[1], cmd(ParamName::If, 0, 0, Value::Int(0)));
    }
}

#[test]
fn band_scroll_uses_the_offset_tuned_frequency() {
    // 7.020 MHz + 10 kHz offset sits above the 7.025 breakpoint.
    let cache = tuned_cache(7_020_000, 10_000, 0);
    let up = resolve(&cache, rx0(), Action::BandScroll, EventValue::ScrollUp);
    assert_eq!(up[0], cmd(ParamName::Dds, 0, 0, Value::Int(7_175_000)));
}

#[test]
fn band_scroll_up_from_top_wraps_to_first() {
    let cache = tuned_cache(147_000_000, 0, 0);
    let up = resolve(&cache, rx0(), Action::BandScroll, EventValue::ScrollUp);
    assert_eq!(up[0], cmd(ParamName::Dds, 0, 0, Value::Int(1_900_000)));
}

#[test]
fn band_scroll_down_from_bottom_wraps_to_last() {
    let cache = tuned_cache(1_850_000, 0, 0);
    let down = resolve(&cache, rx0(), Action::BandScroll, EventValue::ScrollDown);
    assert_eq!(down[0], cmd(ParamName::Dds, 0, 0, Value::Int(147_000_000)));
}

#[test]
fn band_scroll_ignores_clicks() {
    let cache = ParameterCache::new();
    assert!(resolve(&cache, rx0(), Action::BandScroll, EventValue::Click).is_empty());
}

#[test]
fn band_scroll_resets_only_the_selected_sub_receiver() {
    let cache = tuned_cache(14_000_000, 0, 3_000);
    let up = resolve(&cache, select(1, 1), Action::BandScroll, EventValue::ScrollUp);
    assert_eq!(
        up,
        vec![
            cmd(ParamName::Dds, 1, 0, Value::Int(14_025_000)),
            cmd(ParamName::If, 1, 1, Value::Int(0)),
        ]
    );
    assert_eq!(up[0].key.sub_receiver, None);
}

#[test]
fn freq_scroll_steps_the_offset_and_rewrites_dds() {
    let cache = tuned_cache(7_100_000, 1_000, 0);
    let up = resolve(&cache, rx0(), Action::FreqScroll { step: 250 }, EventValue::ScrollUp);
    assert_eq!(
        up,
        vec![
            cmd(ParamName::Dds, 0, 0, Value::Int(7_100_000)),
            cmd(ParamName::If, 0, 0, Value::Int(1_250)),
        ]
    );

    let down = resolve(
        &cache,
        rx0(),
        Action::FreqScroll { step: 2_500 },
        EventValue::ScrollDown,
    );
    assert_eq!(down[1], cmd(ParamName::If, 0, 0, Value::Int(-1_500)));
}

#[test]
fn freq_scroll_clamps_to_if_limits() {
    let cache = tuned_cache(7_100_000, 47_900, 0);
    let up = resolve(&cache, rx0(), Action::FreqScroll { step: 250 }, EventValue::ScrollUp);
    assert_eq!(up[1], cmd(ParamName::If, 0, 0, Value::Int(48_000)));

    let cache = tuned_cache(7_100_000, -47_000, 0);
    let down = resolve(
        &cache,
        rx0(),
        Action::FreqScroll { step: 2_500 },
        EventValue::ScrollDown,
    );
    assert_eq!(down[1], cmd(ParamName::If, 0, 0, Value::Int(-48_000)));
}

#[test]
fn freq_click_on_primary_folds_offset_into_dds() {
    let cache = tuned_cache(7_100_000, 1_750, -300);
    let click = resolve(&cache, rx0(), Action::FreqScroll { step: 250 }, EventValue::Click);
    assert_eq!(
        click,
        vec![
            cmd(ParamName::Dds, 0, 0, Value::Int(7_101_750)),
            cmd(ParamName::If, 0, 0, Value::Int(0)),
        ]
    );
}

#[test]
fn freq_click_on_secondary_snaps_to_primary_offset() {
    let cache = tuned_cache(7_100_000, 1_750, -300);
    let click = resolve(
        &cache,
        select(0, 1),
        Action::FreqScroll { step: 250 },
        EventValue::Click,
    );
    assert_eq!(
        click,
        vec![
            cmd(ParamName::Dds, 0, 1, Value::Int(7_100_000)),
            cmd(ParamName::If, 0, 1, Value::Int(1_750)),
        ]
    );
}

#[test]
fn filter_main_scroll_in_usb_moves_only_the_high_edge() {
    let cache = ParameterCache::new();
    with_filter(&cache, "USB", 100, 2_800);
    let up = resolve(
        &cache,
        rx0(),
        Action::FilterScroll(FilterSide::Main),
        EventValue::ScrollUp,
    );
    assert_eq!(
        up,
        vec![cmd(
            ParamName::RxFilterBand,
            0,
            0,
            Value::Pair(100, 2_825)
        )]
    );
}

#[test]
fn filter_main_scroll_widens_symmetric_modes_on_both_edges() {
    let cache = ParameterCache::new();
    with_filter(&cache, "AM", -3_000, 3_000);
    let up = resolve(
        &cache,
        rx0(),
        Action::FilterScroll(FilterSide::Main),
        EventValue::ScrollUp,
    );
    assert_eq!(up[0].value, Value::Pair(-3_025, 3_025));
    let down = resolve(
        &cache,
        rx0(),
        Action::FilterScroll(FilterSide::Main),
        EventValue::ScrollDown,
    );
    assert_eq!(down[0].value, Value::Pair(-2_975, 2_975));
}

#[test]
fn filter_single_edge_scroll_uses_fixed_step() {
    let cache = ParameterCache::new();
    with_filter(&cache, "LSB", -2_700, -100);
    let left = resolve(
        &cache,
        rx0(),
        Action::FilterScroll(FilterSide::Left),
        EventValue::ScrollDown,
    );
    assert_eq!(left[0].value, Value::Pair(-2_725, -100));
    let right = resolve(
        &cache,
        rx0(),
        Action::FilterScroll(FilterSide::Right),
        EventValue::ScrollUp,
    );
    assert_eq!(right[0].value, Value::Pair(-2_700, -75));
}

#[test]
fn filter_click_restores_mode_defaults() {
    let cache = ParameterCache::new();
    with_filter(&cache, "cw", -400, 90);

    let left = resolve(
        &cache,
        rx0(),
        Action::FilterScroll(FilterSide::Left),
        EventValue::Click,
    );
    assert_eq!(left[0].value, Value::Pair(-250, 90));

    let right = resolve(
        &cache,
        rx0(),
        Action::FilterScroll(FilterSide::Right),
        EventValue::Click,
    );
    assert_eq!(right[0].value, Value::Pair(-400, 250));

    let main = resolve(
        &cache,
        rx0(),
        Action::FilterScroll(FilterSide::Main),
        EventValue::Click,
    );
    assert_eq!(main[0].value, Value::Pair(-250, 250));
}

#[test]
fn filter_scroll_rejects_modes_without_defaults() {
    let cache = ParameterCache::new();
    with_filter(&cache, "SAM", -3_000, 3_000);
    let bands = BandTable::default();
    let err = Resolver::new(&cache, &bands, rx0())
        .resolve(&Action::FilterScroll(FilterSide::Main), EventValue::ScrollUp)
        .expect_err("unknown mode");
    assert!(matches!(err, ControlError::UnknownModulation(mode) if mode == "SAM"));
}

#[test]
fn mod_scroll_cycles_and_wraps_both_ways() {
    let cache = ParameterCache::new();
    let set_mode = |mode: &str| {
        cache.update(
            ParamName::Modulation,
            Some(ReceiverId(0)),
            None,
            Value::Text(mode.into()),
        )
    };

    set_mode("WFM");
    let up = resolve(&cache, rx0(), Action::ModScroll, EventValue::ScrollUp);
    assert_eq!(up, vec![cmd(ParamName::Modulation, 0, 0, Value::Text("AM".into()))]);

    set_mode("AM");
    let down = resolve(&cache, rx0(), Action::ModScroll, EventValue::ScrollDown);
    assert_eq!(down[0].value, Value::Text("WFM".into()));

    // Walk the whole list upward.
    let mut seen = Vec::new();
    let mut mode = MODULATIONS[0].to_string();
    for _ in 0..MODULATIONS.len() {
        set_mode(&mode);
        let next = resolve(&cache, rx0(), Action::ModScroll, EventValue::ScrollUp);
        let Value::Text(next) = next[0].value.clone() else {
            panic!("modulation should be text");
        };
        seen.push(next.clone());
        mode = next;
    }
    assert_eq!(seen.last().map(String::as_str), Some(MODULATIONS[0]));
    assert_eq!(seen.len(), MODULATIONS.len());
}

#[test]
fn mod_scroll_enters_the_list_from_an_unlisted_mode() {
    let cache = ParameterCache::new();
    cache.update(
        ParamName::Modulation,
        Some(ReceiverId(0)),
        None,
        Value::Text("DSB".into()),
    );
    let up = resolve(&cache, rx0(), Action::ModScroll, EventValue::ScrollUp);
    assert_eq!(up[0].value, Value::Text("AM".into()));
    let down = resolve(&cache, rx0(), Action::ModScroll, EventValue::ScrollDown);
    assert_eq!(down[0].value, Value::Text("WFM".into()));
    assert!(resolve(&cache, rx0(), Action::ModScroll, EventValue::Click).is_empty());
}

#[test]
fn toggle_negates_on_press_only() {
    let cache = ParameterCache::new();
    cache.update(
        ParamName::RxNbEnable,
        Some(ReceiverId(0)),
        None,
        Value::Bool(false),
    );
    let action = Action::Toggle(ParamName::RxNbEnable);
    assert_eq!(
        resolve(&cache, rx0(), action.clone(), EventValue::KeyDown),
        vec![cmd(ParamName::RxNbEnable, 0, 0, Value::Bool(true))]
    );
    assert_eq!(
        resolve(&cache, rx0(), action.clone(), EventValue::Click)[0].value,
        Value::Bool(true)
    );
    assert!(resolve(&cache, rx0(), action, EventValue::KeyUp).is_empty());
}

#[test]
fn momentary_follows_the_key() {
    let cache = ParameterCache::new();
    let action = Action::Momentary(ParamName::Trx);
    assert_eq!(
        resolve(&cache, select(1, 0), action.clone(), EventValue::KeyDown),
        vec![cmd(ParamName::Trx, 1, 0, Value::Bool(true))]
    );
    assert_eq!(
        resolve(&cache, select(1, 0), action, EventValue::KeyUp),
        vec![cmd(ParamName::Trx, 1, 0, Value::Bool(false))]
    );
}

#[test]
fn generic_set_writes_the_literal_on_press() {
    let cache = ParameterCache::new();
    let action = Action::GenericSet {
        name: ParamName::Drive,
        value: Value::Int(50),
    };
    let out = resolve(&cache, select(1, 1), action.clone(), EventValue::Click);
    assert_eq!(out, vec![cmd(ParamName::Drive, 0, 0, Value::Int(50))]);
    assert_eq!(out[0].to_wire(), "drive:50;");
    assert!(resolve(&cache, rx0(), action, EventValue::ScrollUp).is_empty());
}

#[test]
fn generic_scroll_steps_from_the_cached_value() {
    let cache = ParameterCache::new();
    cache.update(ParamName::SqlLevel, Some(ReceiverId(0)), None, Value::Int(-80));
    let action = Action::GenericScroll {
        name: ParamName::SqlLevel,
        step: 1,
    };
    assert_eq!(
        resolve(&cache, rx0(), action.clone(), EventValue::ScrollUp),
        vec![cmd(ParamName::SqlLevel, 0, 0, Value::Int(-79))]
    );
    assert_eq!(
        resolve(&cache, rx0(), action.clone(), EventValue::ScrollDown)[0].value,
        Value::Int(-81)
    );
    assert!(resolve(&cache, rx0(), action, EventValue::Click).is_empty());
}

#[test]
fn enable_toggle_targets_receiver_or_channel() {
    let cache = ParameterCache::new();
    cache.update(ParamName::RxEnable, Some(ReceiverId(1)), None, Value::Bool(true));
    cache.update(
        ParamName::RxChannelEnable,
        Some(ReceiverId(0)),
        Some(SubReceiverId(1)),
        Value::Bool(false),
    );

    assert!(resolve(&cache, rx0(), Action::EnableToggle, EventValue::Click).is_empty());
    assert_eq!(
        resolve(&cache, select(1, 0), Action::EnableToggle, EventValue::Click),
        vec![cmd(ParamName::RxEnable, 1, 0, Value::Bool(false))]
    );
    assert_eq!(
        resolve(&cache, select(0, 1), Action::EnableToggle, EventValue::Click),
        vec![cmd(ParamName::RxChannelEnable, 0, 1, Value::Bool(true))]
    );
    assert!(resolve(&cache, select(1, 0), Action::EnableToggle, EventValue::ScrollUp).is_empty());
}

#[test]
fn volume_reset_writes_balance_then_volume() {
    let cache = ParameterCache::new();
    let out = resolve(&cache, select(0, 1), Action::VolumeReset, EventValue::Click);
    assert_eq!(
        out,
        vec![
            cmd(ParamName::RxBalance, 0, 1, Value::Int(0)),
            cmd(ParamName::RxVolume, 0, 1, Value::Int(0)),
        ]
    );
    assert_eq!(
        resolve(&cache, rx0(), Action::VolumeReset, EventValue::KeyDown).len(),
        2
    );
    assert!(resolve(&cache, rx0(), Action::VolumeReset, EventValue::KeyUp).is_empty());
}

#[test]
fn missing_parameters_fail_the_resolution() {
    let cache = ParameterCache::new();
    let bands = BandTable::default();
    let resolver = Resolver::new(&cache, &bands, rx0());
    let err = resolver
        .resolve(&Action::FreqScroll { step: 250 }, EventValue::ScrollUp)
        .expect_err("empty cache");
    assert!(matches!(err, ControlError::MissingParameter { .. }));

    // IF limits are read after the offsets.
    let cache = ParameterCache::new();
    cache.update(
        ParamName::Dds,
        Some(ReceiverId(0)),
        None,
        Value::Int(7_000_000),
    );
    cache.update(
        ParamName::If,
        Some(ReceiverId(0)),
        Some(SubReceiverId(0)),
        Value::Int(0),
    );
    let err = Resolver::new(&cache, &bands, rx0())
        .resolve(&Action::FreqScroll { step: 250 }, EventValue::ScrollUp)
        .expect_err("no limits");
    assert!(matches!(
        err,
        ControlError::MissingParameter { key } if key.name == ParamName::IfLimits
    ));
}

#[test]
fn extreme_reported_values_saturate() {
    let cache = tuned_cache(i64::MAX, 1_000, 0);
    let up = resolve(&cache, rx0(), Action::BandScroll, EventValue::ScrollUp);
    assert_eq!(up[0], cmd(ParamName::Dds, 0, 0, Value::Int(1_900_000)));

    let click = resolve(&cache, rx0(), Action::FreqScroll { step: 250 }, EventValue::Click);
    assert_eq!(click[0], cmd(ParamName::Dds, 0, 0, Value::Int(i64::MAX)));

    cache.update(ParamName::SqlLevel, Some(ReceiverId(0)), None, Value::Int(i64::MIN));
    let down = resolve(
        &cache,
        rx0(),
        Action::GenericScroll {
            name: ParamName::SqlLevel,
            step: 1,
        },
        EventValue::ScrollDown,
    );
    assert_eq!(down[0].value, Value::Int(i64::MIN));

    with_filter(&cache, "USB", 0, i64::MAX);
    let wider = resolve(
        &cache,
        rx0(),
        Action::FilterScroll(FilterSide::Right),
        EventValue::ScrollUp,
    );
    assert_eq!(wider[0].value, Value::Pair(0, i64::MAX));
}
