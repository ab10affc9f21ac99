use serde::Deserialize;

#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    fn into_result<T>(self, ok: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(ok()) } else { Err(self) }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RateMovieForm {
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub review: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RatingUpdate {
    pub rating: f64,
    pub review: Option<String>,
}

impl RateMovieForm {
    pub fn validate(&self) -> Result<RatingUpdate, FieldErrors> {
        let mut errors = FieldErrors::default();

        let raw = self.rating.trim();
        let rating = if raw.is_empty() {
            errors.push("rating", "Rating is required.");
            None
        } else {
            match raw.parse::<f64>() {
                Ok(r) if r.is_finite() => Some(r),
                _ => {
                    errors.push("rating", "Rating must be a number.");
                    None
                }
            }
        };

        let review = Some(self.review.trim()).filter(|r| !r.is_empty()).map(str::to_string);

        errors.into_result(|| RatingUpdate { rating: rating.unwrap_or_default(), review })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AddMovieForm {
    #[serde(default)]
    pub title: String,
}

impl AddMovieForm {
    /// Returns the trimmed title to search for.
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = self.title.trim();
        if title.is_empty() {
            errors.push("title", "Movie title is required.");
        }
        errors.into_result(|| title.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(rating: &str, review: &str) -> RateMovieForm {
        RateMovieForm { rating: rating.into(), review: review.into() }
    }

    #[test]
    fn rating_is_parsed_without_range_checks() {
        assert_eq!(
            rate(" 7.5 ", "  Great  ").validate(),
            Ok(RatingUpdate { rating: 7.5, review: Some("Great".into()) })
        );
        assert_eq!(rate("42", "").validate().unwrap().rating, 42.0);
        assert_eq!(rate("-3", "").validate().unwrap().rating, -3.0);
    }

    #[test]
    fn blank_review_is_stored_as_none() {
        assert_eq!(rate("5", "   ").validate().unwrap().review, None);
    }

    #[test]
    fn missing_or_malformed_rating_is_a_field_error() {
        let errors = rate("", "nice").validate().unwrap_err();
        assert_eq!(errors.get("rating"), Some("Rating is required."));

        for bad in ["ten", "NaN", "inf"] {
            let errors = rate(bad, "").validate().unwrap_err();
            assert_eq!(errors.get("rating"), Some("Rating must be a number."), "{bad}");
            assert_eq!(errors.get("review"), None);
        }
    }

    #[test]
    fn title_must_not_be_blank() {
        let form = AddMovieForm { title: "  Jaws ".into() };
        assert_eq!(form.validate(), Ok("Jaws".to_string()));

        let errors = AddMovieForm { title: "\t".into() }.validate().unwrap_err();
        assert_eq!(errors.get("title"), Some("Movie title is required."));
    }
}
