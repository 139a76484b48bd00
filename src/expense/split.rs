//! Divides the shared part of an expense equally between its participants.

use crate::Error;

/// A person taking part in an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    /// The participant's user ID, as issued by the identity provider.
    pub id: String,
    /// The participant's display name.
    pub name: String,
}

/// One participant's share of an expense that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSplit {
    /// The ID of the participant who owes this share.
    pub user_id: String,
    /// The participant's display name at the time the expense was created.
    pub user_name: String,
    /// The amount of money owed.
    pub amount: f64,
    /// The share of the expense amount, in percent.
    pub percentage: f64,
}

/// Split `split_percentage` percent of `amount` equally between `participants`.
///
/// Every participant gets the same amount and percentage, so the amounts add
/// up to `amount * split_percentage / 100` and the percentages add up to
/// `split_percentage`. Remainders from the division are not redistributed.
///
/// # Errors
/// Returns:
/// - [Error::InvalidAmount] if `amount` is negative or not finite,
/// - [Error::InvalidSplitPercentage] if `split_percentage` is not within 0-100,
/// - [Error::NoParticipants] if `participants` is empty.
pub fn allocate(
    amount: f64,
    split_percentage: f64,
    participants: &[Participant],
) -> Result<Vec<NewSplit>, Error> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount(amount));
    }

    if !split_percentage.is_finite() || !(0.0..=100.0).contains(&split_percentage) {
        return Err(Error::InvalidSplitPercentage(split_percentage));
    }

    if participants.is_empty() {
        return Err(Error::NoParticipants);
    }

    let participant_count = participants.len() as f64;
    // Scale the percentage first so large amounts cannot overflow.
    let split_amount = amount * (split_percentage / 100.0);
    let per_person_amount = split_amount / participant_count;
    let per_person_percentage = split_percentage / participant_count;

    Ok(participants
        .iter()
        .map(|participant| NewSplit {
            user_id: participant.id.clone(),
            user_name: participant.name.clone(),
            amount: per_person_amount,
            percentage: per_person_percentage,
        })
        .collect())
}

#[cfg(test)]
mod allocate_tests {
    use crate::{
        Error,
        expense::split::{NewSplit, Participant, allocate},
    };

    const TOLERANCE: f64 = 1e-9;

    fn participants(ids: &[&str]) -> Vec<Participant> {
        ids.iter()
            .map(|id| Participant {
                id: id.to_string(),
                name: format!("{id} name"),
            })
            .collect()
    }

    #[test]
    fn splits_evenly_between_two() {
        let splits = allocate(100.0, 100.0, &participants(&["A", "B"])).unwrap();

        assert_eq!(
            splits,
            vec![
                NewSplit {
                    user_id: "A".to_owned(),
                    user_name: "A name".to_owned(),
                    amount: 50.0,
                    percentage: 50.0,
                },
                NewSplit {
                    user_id: "B".to_owned(),
                    user_name: "B name".to_owned(),
                    amount: 50.0,
                    percentage: 50.0,
                },
            ]
        );
    }

    #[test]
    fn only_splits_the_given_percentage() {
        let splits = allocate(200.0, 50.0, &participants(&["A", "B", "C", "D"])).unwrap();

        assert_eq!(splits.len(), 4);
        for split in splits {
            assert_eq!(split.amount, 25.0);
            assert_eq!(split.percentage, 12.5);
        }
    }

    #[test]
    fn sums_match_for_awkward_divisions() {
        let cases = [
            (100.0, 100.0, 3),
            (10.0, 33.3, 7),
            (0.01, 100.0, 6),
            (12345.67, 81.0, 11),
            (0.0, 100.0, 2),
            (99.99, 0.0, 5),
        ];

        for (amount, split_percentage, count) in cases {
            let ids: Vec<String> = (0..count).map(|i| format!("user{i}")).collect();
            let ids: Vec<&str> = ids.iter().map(String::as_str).collect();

            let splits = allocate(amount, split_percentage, &participants(&ids)).unwrap();

            let total_amount: f64 = splits.iter().map(|split| split.amount).sum();
            let total_percentage: f64 = splits.iter().map(|split| split.percentage).sum();
            let want_amount = amount * split_percentage / 100.0;
            assert!(
                (total_amount - want_amount).abs() < TOLERANCE,
                "want splits to sum to {want_amount}, got {total_amount}"
            );
            assert!(
                (total_percentage - split_percentage).abs() < TOLERANCE,
                "want percentages to sum to {split_percentage}, got {total_percentage}"
            );
            assert!(
                splits
                    .windows(2)
                    .all(|pair| pair[0].amount == pair[1].amount
                        && pair[0].percentage == pair[1].percentage),
                "want every split to be identical, got {splits:?}"
            );
        }
    }

    #[test]
    fn large_amounts_stay_finite() {
        let amount = 1e307;

        for ids in [vec!["A"], vec!["A", "B", "C"]] {
            let splits = allocate(amount, 100.0, &participants(&ids)).unwrap();

            assert!(
                splits.iter().all(|split| split.amount.is_finite()),
                "want finite split amounts, got {splits:?}"
            );
            let total_amount: f64 = splits.iter().map(|split| split.amount).sum();
            assert!(
                ((total_amount - amount) / amount).abs() < TOLERANCE,
                "want splits to sum to {amount}, got {total_amount}"
            );
        }
    }

    #[test]
    fn keeps_participant_order() {
        let splits = allocate(30.0, 100.0, &participants(&["C", "A", "B"])).unwrap();

        let ids: Vec<&str> = splits.iter().map(|split| split.user_id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[test]
    fn fails_on_no_participants() {
        assert_eq!(allocate(100.0, 100.0, &[]), Err(Error::NoParticipants));
    }

    #[test]
    fn fails_on_negative_amount() {
        assert_eq!(
            allocate(-1.0, 100.0, &participants(&["A"])),
            Err(Error::InvalidAmount(-1.0))
        );
    }

    #[test]
    fn fails_on_non_finite_amount() {
        assert_eq!(
            allocate(f64::INFINITY, 100.0, &participants(&["A"])),
            Err(Error::InvalidAmount(f64::INFINITY))
        );
        assert!(matches!(
            allocate(f64::NAN, 100.0, &participants(&["A"])),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn fails_on_out_of_range_percentage() {
        assert_eq!(
            allocate(10.0, 100.5, &participants(&["A"])),
            Err(Error::InvalidSplitPercentage(100.5))
        );
        assert_eq!(
            allocate(10.0, -0.5, &participants(&["A"])),
            Err(Error::InvalidSplitPercentage(-0.5))
        );
        assert!(matches!(
            allocate(10.0, f64::NAN, &participants(&["A"])),
            Err(Error::InvalidSplitPercentage(_))
        ));
    }

    #[test]
    fn validates_amount_before_participants() {
        assert_eq!(
            allocate(-5.0, 100.0, &[]),
            Err(Error::InvalidAmount(-5.0))
        );
    }
}
