//! Pre-solve checks on the request as a whole.
use crate::model::{
    core::options::ModelSpec,
    errors::{ModelError, ModelResult},
};
use std::path::Path;

/// Check that a processing request is valid.
///
/// The observed data file has to exist and the model configuration has to be
/// locked. Failures abort the request before any solving starts.
///
/// # Errors
/// - [`ModelError::DataFileMissing`] if `data_file` does not exist.
/// - [`ModelError::ConfigurationNotLocked`] if `spec` is not locked.
pub fn check_process(data_file: impl AsRef<Path>, spec: &ModelSpec) -> ModelResult<()> {
    let path = data_file.as_ref();
    if !path.exists() {
        return Err(ModelError::DataFileMissing { path: path.display().to_string() });
    }
    if !spec.is_locked() {
        return Err(ModelError::ConfigurationNotLocked);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::core::rewards::RewardCoefficients;
    use ndarray::Array2;
    use tempfile::NamedTempFile;

    fn spec() -> ModelSpec {
        let coeffs = RewardCoefficients::new([0.0; 6], [0.0; 6], [0.0; 3], [0.0]).unwrap();
        ModelSpec::new(2, 10, 20, 0.9, coeffs, Array2::zeros((4, 4))).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // An existing file and a locked spec pass.
    fn existing_file_and_locked_spec_pass() {
        let file = NamedTempFile::new().unwrap();
        assert_eq!(check_process(file.path(), &spec().lock()), Ok(()));
    }

    #[test]
    // Purpose
    // -------
    // A missing file is reported before the lock is looked at; an unlocked
    // spec fails even when the file exists.
    fn failures_name_the_violated_condition() {
        let file = NamedTempFile::new().unwrap();
        let missing = file.path().with_extension("missing");

        assert!(matches!(
            check_process(&missing, &spec()),
            Err(ModelError::DataFileMissing { .. })
        ));
        assert_eq!(check_process(file.path(), &spec()), Err(ModelError::ConfigurationNotLocked));
    }
}
