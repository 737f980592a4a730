use std::f32::consts::{PI, TAU};

use cgmath::{Matrix4, Rad, SquareMatrix};
use learn_ngin::animation::{
    TUMBLE_PERIOD, Tumble, morph_blend, morph_weights, seconds_from_millis, spin, tumble,
};

use crate::common::test_utils::assert_close;

mod common;

#[test]
fn time_has_millisecond_resolution() {
    assert_eq!(seconds_from_millis(0), 0.0);
    assert_eq!(seconds_from_millis(1500), 1.5);
    assert_close(seconds_from_millis(16), 0.016);
}

#[test]
fn spin_is_one_radian_per_second() {
    assert_eq!(spin(0.0), Rad(0.0));
    assert_eq!(spin(2.5), Rad(2.5));
}

#[test]
fn tumble_halfway_is_one_full_horizontal_turn() {
    let t = tumble(8.0);
    assert_eq!(t.horizontal, Rad(TAU));
    assert_eq!(t.vertical, Rad(0.0));
}

#[test]
fn tumble_wraps_after_one_period() {
    assert_eq!(tumble(TUMBLE_PERIOD), tumble(0.0));
    assert_eq!(tumble(16.0), tumble(0.0));
    assert_eq!(tumble(0.0).horizontal, Rad(0.0));
    assert_eq!(tumble(0.0).vertical, Rad(0.0));
}

#[test]
fn tumble_first_phase_turns_horizontally() {
    let t = tumble(4.0);
    assert_close(t.horizontal.0, PI);
    assert_eq!(t.vertical, Rad(0.0));
}

#[test]
fn tumble_second_phase_keeps_horizontal_and_turns_vertically() {
    let t = tumble(12.0);
    assert_eq!(t.horizontal, Rad(TAU));
    assert_close(t.vertical.0, PI);
}

#[test]
fn tumble_is_deterministic() {
    for time in [0.0, 0.123, 3.3, 7.999, 8.0, 11.5, 15.9, 40.2] {
        assert_eq!(tumble(time), tumble(time));
        let (now, later) = (tumble(time), tumble(time + TUMBLE_PERIOD));
        assert_close(now.horizontal.0, later.horizontal.0);
        assert_close(now.vertical.0, later.vertical.0);
    }
}

#[test]
fn tumble_at_rest_is_identity() {
    let rest = Tumble {
        horizontal: Rad(0.0),
        vertical: Rad(0.0),
    };
    assert_eq!(rest.matrix(), Matrix4::identity());
}

#[test]
fn morph_weights_always_sum_to_one() {
    let mut time = 0.0;
    while time < 20.0 {
        let [a, b] = morph_weights(time);
        assert_close(a + b, 1.0);
        assert!((0.0..=1.0).contains(&a));
        assert!((0.0..=1.0).contains(&b));
        time += 0.05;
    }
}

#[test]
fn morph_weights_follow_a_sine() {
    assert_close_pair(morph_weights(0.0), [0.5, 0.5]);
    assert_close_pair(morph_weights(PI / 2.0), [0.0, 1.0]);
    assert_close_pair(morph_weights(3.0 * PI / 2.0), [1.0, 0.0]);
    assert_close(morph_blend(PI / 6.0), 0.75);
}

fn assert_close_pair(actual: [f32; 2], expected: [f32; 2]) {
    assert_close(actual[0], expected[0]);
    assert_close(actual[1], expected[1]);
}
