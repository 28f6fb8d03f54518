use super::*;

use std::collections::HashSet;

fn is_base36(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
}

#[test]
fn random_base36_has_requested_length() {
    for len in [0, 1, 6, 9, 20] {
        let s = random_base36(len);
        assert_eq!(s.len(), len);
        assert!(is_base36(&s));
    }
}

#[test]
fn student_id_format() {
    let id = student_id();
    let suffix = id.strip_prefix("student_").unwrap();
    assert_eq!(suffix.len(), 6);
    assert!(is_base36(suffix));
}

#[test]
fn path_and_message_ids_embed_timestamp() {
    let path = path_id(1234);
    assert!(path.starts_with("path_1234_"));
    assert_eq!(path.len(), "path_1234_".len() + 9);

    let msg = message_id(1234);
    assert!(msg.starts_with("msg_1234_"));
    assert_eq!(msg.len(), "msg_1234_".len() + 6);
}

#[test]
fn ids_in_same_millisecond_are_distinct() {
    let ids: HashSet<String> = (0..200).map(|_| message_id(5)).collect();
    assert_eq!(ids.len(), 200);
}

#[test]
fn random_index_stays_in_range() {
    for _ in 0..100 {
        assert!(random_index(20) < 20);
    }
    assert_eq!(random_index(1), 0);
}

#[test]
fn sampler_skips_version_and_variant_bytes() {
    let mut sampler = Sampler::new(|| std::array::from_fn(|i| u8::try_from(i).unwrap()));
    let drawn: Vec<u8> = (0..14).map(|_| sampler.next_byte()).collect();
    assert_eq!(drawn, vec![0, 1, 2, 3, 4, 5, 7, 9, 10, 11, 12, 13, 14, 15]);
}

#[test]
fn sampler_rejects_draws_above_the_even_zone() {
    // u64::MAX is a multiple of 3, so an all-ones word is the one rejected draw.
    let mut calls = 0;
    let mut sampler = Sampler::new(|| {
        calls += 1;
        if calls == 1 { [0xFF; 16] } else { [0; 16] }
    });
    assert_eq!(sampler.below(3), 0);
    drop(sampler);
    assert_eq!(calls, 2);
}

#[test]
fn random_base36_reaches_every_digit() {
    let seen: HashSet<char> = random_base36(2000).chars().collect();
    assert_eq!(seen.len(), 36);
}
