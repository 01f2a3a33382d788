use ytmb::utils::*;

#[test]
fn test_is_ok_filename_accepts_plain_names() {
    assert!(is_ok_filename("abcdefg1234"));
    assert!(is_ok_filename("Some_Test_Name-Version2"));
}

#[test]
fn test_is_ok_filename_rejects_special_characters() {
    assert!(!is_ok_filename("#BadNames"));
    assert!(!is_ok_filename("dots.dots.dots"));
    assert!(!is_ok_filename("we/love/directories"));
    assert!(!is_ok_filename(r"c\windows\perhaps"));
    assert!(!is_ok_filename("spaces are bad"));
}

#[test]
fn test_is_ok_filename_rejects_empty() {
    assert!(!is_ok_filename(""));
}

#[test]
fn test_generate_id() {
    let id = generate_id("PL", 32);

    assert_eq!(id.len(), 34);
    assert!(id.starts_with("PL"));
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated ids should be different
    assert_ne!(id, generate_id("PL", 32));
}

#[test]
fn test_split_evenly_sums_to_total() {
    for total in 0..40 {
        for parts in 1..7 {
            let shares = split_evenly(total, parts);
            assert_eq!(shares.len(), parts);
            assert_eq!(shares.iter().sum::<usize>(), total);
            let max = shares.iter().max().copied().unwrap_or(0);
            let min = shares.iter().min().copied().unwrap_or(0);
            assert!(max - min <= 1);
        }
    }
}
