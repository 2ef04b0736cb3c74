use scrutin_rs::VoteRecord;
use scrutin_rs::stats::candidate_summary;

fn vr(region: &str, candidate: &str, votes: f64) -> VoteRecord {
    VoteRecord::new(region, candidate, 2024, votes)
}

#[test]
fn per_candidate_stats_handle_even_and_odd_counts() {
    // cand1 over four regions: [1,2,3,4] -> median = 2.5
    // cand2 over three regions: [10,20,30] -> median = 20
    let rows = vec![
        vr("A", "cand1", 1.0),
        vr("B", "cand1", 2.0),
        vr("C", "cand1", 3.0),
        vr("D", "cand1", 4.0),
        vr("A", "cand2", 10.0),
        vr("B", "cand2", 20.0),
        vr("C", "cand2", 30.0),
    ];
    let got = candidate_summary(&rows);
    assert_eq!(got.len(), 2);

    let a = &got[0];
    assert_eq!(a.candidate, "cand1");
    assert_eq!(a.count, 4);
    assert_eq!(a.total, 10.0);
    assert_eq!(a.min, Some(1.0));
    assert_eq!(a.max, Some(4.0));
    assert!((a.mean.unwrap() - 2.5).abs() < 1e-9);
    assert!((a.median.unwrap() - 2.5).abs() < 1e-9);

    let b = &got[1];
    assert_eq!(b.candidate, "cand2");
    assert_eq!(b.count, 3);
    assert_eq!(b.total, 60.0);
    assert_eq!(b.median, Some(20.0));
}

#[test]
fn candidates_come_back_sorted() {
    let rows = vec![vr("A", "zeta", 1.0), vr("A", "alpha", 2.0)];
    let got = candidate_summary(&rows);
    let names: Vec<&str> = got.iter().map(|s| s.candidate.as_str()).collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}

#[test]
fn empty_input_yields_no_summaries() {
    assert!(candidate_summary(&[]).is_empty());
}
