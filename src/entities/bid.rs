use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One carrier's submission against one lane of an RFP.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bid {
    pub id: Uuid,
    pub rfp_id: Uuid,
    pub lane_id: Uuid,
    pub carrier_id: Uuid,
    pub rate: f64,
    pub transit_time: Option<String>,
    pub notes: Option<String>,
    pub decision: Decision,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Pending,
    Accepted,
    Rejected,
}

impl Decision {
    pub fn name(&self) -> String {
        match self {
            Self::Pending => "pending".into(),
            Self::Accepted => "accepted".into(),
            Self::Rejected => "rejected".into(),
        }
    }
}

/// One entry of a public tender submission. The rate arrives as free text
/// and is validated before a Bid is ever created.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BidRow {
    pub lane_id: Uuid,
    pub rate: String,
    pub transit_time: Option<String>,
    pub notes: Option<String>,
}

impl Bid {
    pub fn new(
        rfp_id: Uuid,
        lane_id: Uuid,
        carrier_id: Uuid,
        rate: f64,
        transit_time: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            rfp_id,
            lane_id,
            carrier_id,
            rate,
            transit_time,
            notes,
            decision: Decision::Pending,
        }
    }

    // Decisions are total so a lane's winner can be switched and bulk
    // acceptance can be re-run; the one-accepted-per-lane invariant is
    // enforced by the transaction that flips the decisions.
    pub fn accept(&mut self) {
        self.decision = Decision::Accepted;
    }

    pub fn reject(&mut self) {
        self.decision = Decision::Rejected;
    }
}

/// Parses an operator- or carrier-supplied rate. Blank, non-numeric, and
/// non-positive values yield None and the entry is dropped from the
/// submission.
pub fn parse_rate(input: &str) -> Option<f64> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return None;
    }

    match trimmed.parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate > 0.0 => Some(rate),
        _ => None,
    }
}

#[test]
fn only_valid_numeric_rates_survive() {
    let rows = ["120.50", "", "abc"];

    let parsed: Vec<f64> = rows.iter().filter_map(|r| parse_rate(r)).collect();

    assert_eq!(parsed, vec![120.50]);
}

#[test]
fn rate_parsing_edge_cases() {
    assert_eq!(parse_rate(" 99 "), Some(99.0));
    assert_eq!(parse_rate("0"), None);
    assert_eq!(parse_rate("-5"), None);
    assert_eq!(parse_rate("NaN"), None);
    assert_eq!(parse_rate("inf"), None);
    assert_eq!(parse_rate("1,200"), None);
}

#[test]
fn decisions_move_freely_between_states() {
    let mut bid = Bid::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        120.5,
        Some("2 days".into()),
        None,
    );

    assert_eq!(bid.decision, Decision::Pending);

    bid.accept();
    assert_eq!(bid.decision, Decision::Accepted);

    bid.reject();
    assert_eq!(bid.decision, Decision::Rejected);

    bid.accept();
    assert_eq!(bid.decision, Decision::Accepted);
}
