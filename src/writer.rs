use crate::{Result, Review};
use std::fs::File;

/// Write accepted reviews to a UTF-8 CSV file: header row from the
/// record's field names, one row per review, no index column.
pub fn save_to_csv(reviews: &[Review], file_path: &str) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = csv::Writer::from_writer(file);

    for review in reviews {
        writer.serialize(review)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Review;

    fn sample() -> Vec<Review> {
        vec![
            Review {
                review_id: Some("RVW123".into()),
                date: Some("Mar 3 2021".into()),
                employee_title: Some("Senior Engineer".into()),
                location: Some("Sarajevo".into()),
                review_title: Some("Solid place to grow".into()),
                overall_rating: Some(4.0),
                pros: Some("Smart colleagues".into()),
                cons: Some("On-call is heavy".into()),
                advice: Some("Listen to engineers".into()),
            },
            // Missing fields must come back missing, not as empty strings.
            Review {
                review_title: Some("Anonymous but fine".into()),
                employee_title: Some("Anonymous".into()),
                overall_rating: Some(3.5),
                ..Default::default()
            },
            Review::default(),
        ]
    }

    #[test]
    fn csv_round_trip_preserves_all_fields() {
        let reviews = sample();

        let mut writer = csv::Writer::from_writer(Vec::new());
        for review in &reviews {
            writer.serialize(review).unwrap();
        }
        let bytes = writer.into_inner().unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let restored: Vec<Review> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();

        assert_eq!(restored, reviews);
    }

    #[test]
    fn header_matches_the_schema_field_order() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(Review::default()).unwrap();
        let bytes = writer.into_inner().unwrap();
        let output = String::from_utf8(bytes).unwrap();

        assert_eq!(
            output.lines().next(),
            Some(
                "review_id,date,employee_title,location,review_title,\
                 overall_rating,pros,cons,advice"
            )
        );
    }
}
