use crate::api::ApiError;
use crate::models::{label_of, ReferenceItem};
use crate::repo::ReferenceRepository;
use crate::stages::notice::{Notice, Notifier, Operation};

/// Stage statuses and stage types, fetched once when the screen is mounted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    pub statuses: Vec<ReferenceItem>,
    pub stage_types: Vec<ReferenceItem>,
}

impl ReferenceData {
    /// Fetch both enumerations. A failed fetch leaves that enumeration empty,
    /// and labels fall back to raw ids.
    pub fn load<R, N>(repo: &R, notifier: &N) -> Self
    where
        R: ReferenceRepository + ?Sized,
        N: Notifier + ?Sized,
    {
        Self {
            statuses: fetch(repo.stage_statuses(), "stage statuses", notifier),
            stage_types: fetch(repo.stage_types(), "stage types", notifier),
        }
    }

    pub fn status_label<'a>(&'a self, id: &'a str) -> &'a str {
        label_of(&self.statuses, id).filter(|l| !l.is_empty()).unwrap_or(id)
    }

    pub fn stage_type_label<'a>(&'a self, id: &'a str) -> &'a str {
        label_of(&self.stage_types, id).filter(|l| !l.is_empty()).unwrap_or(id)
    }
}

fn fetch<N: Notifier + ?Sized>(
    result: Result<Vec<ReferenceItem>, ApiError>,
    subject: &str,
    notifier: &N,
) -> Vec<ReferenceItem> {
    match result {
        Ok(items) => items,
        Err(err) if err.is_unavailable() => {
            log::info!("{} unavailable: {}", subject, err);
            notifier.notify(Notice::unavailable(subject));
            Vec::new()
        }
        Err(err) => {
            log::warn!("Loading {} failed: {}", subject, err);
            notifier.notify(Notice::failed(Operation::Loading, subject));
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::notice::{NoticeLevel, RecordingNotifier};

    struct Partial;

    impl ReferenceRepository for Partial {
        fn stage_statuses(&self) -> Result<Vec<ReferenceItem>, ApiError> {
            Ok(vec![ReferenceItem { id: "1".to_string(), description: "Planned".to_string() }])
        }

        fn stage_types(&self) -> Result<Vec<ReferenceItem>, ApiError> {
            Err(ApiError::NotFound("/types-etape".to_string()))
        }
    }

    #[test]
    fn test_load_with_missing_enumeration() {
        let notifier = RecordingNotifier::new();
        let refs = ReferenceData::load(&Partial, &notifier);
        assert_eq!(refs.status_label("1"), "Planned");
        assert_eq!(refs.status_label("9"), "9");
        assert_eq!(refs.stage_type_label("3"), "3");
        assert_eq!(notifier.levels(), vec![NoticeLevel::Info]);
    }
}
