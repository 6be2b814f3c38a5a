//! Target set construction
//!
//! Pairs each requested volume with the description its snapshot will carry.

use serde::Serialize;
use std::collections::HashSet;

use crate::errors::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeTarget {
    pub volume_id: String,
    pub description: String,
}

/// Validated volume → description mapping for one run, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSet {
    targets: Vec<VolumeTarget>,
}

impl TargetSet {
    /// Build the target set.
    ///
    /// A single description is shared by every volume; otherwise the
    /// description at position *i* belongs to the volume at position *i*.
    pub fn build<V, D>(volumes: &[V], descriptions: &[D]) -> Result<Self, ValidationError>
    where
        V: AsRef<str>,
        D: AsRef<str>,
    {
        if volumes.is_empty() {
            return Err(ValidationError::NoVolumes);
        }

        if descriptions.len() != 1 && descriptions.len() != volumes.len() {
            return Err(ValidationError::DescriptionMismatch {
                descriptions: descriptions.len(),
                volumes: volumes.len(),
            });
        }

        let mut seen = HashSet::with_capacity(volumes.len());
        let mut targets = Vec::with_capacity(volumes.len());

        for (position, volume) in volumes.iter().enumerate() {
            let volume_id = volume.as_ref();
            if volume_id.trim().is_empty() {
                return Err(ValidationError::BlankVolume { position });
            }
            if !seen.insert(volume_id) {
                return Err(ValidationError::DuplicateVolume {
                    volume_id: volume_id.to_string(),
                });
            }

            let description = if descriptions.len() == 1 {
                &descriptions[0]
            } else {
                &descriptions[position]
            };

            targets.push(VolumeTarget {
                volume_id: volume_id.to_string(),
                description: description.as_ref().to_string(),
            });
        }

        Ok(Self { targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Always false for a built set; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VolumeTarget> {
        self.targets.iter()
    }

    pub fn description_for(&self, volume_id: &str) -> Option<&str> {
        self.targets
            .iter()
            .find(|t| t.volume_id == volume_id)
            .map(|t| t.description.as_str())
    }
}

impl IntoIterator for TargetSet {
    type Item = VolumeTarget;
    type IntoIter = std::vec::IntoIter<VolumeTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.into_iter()
    }
}
