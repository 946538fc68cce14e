use crate::foundation::core::Split;
use crate::foundation::error::{OrbitsetError, OrbitsetResult};

/// How trajectory samples are divided between the train and test splits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PartitionPolicy {
    /// The first `floor(n·f)` samples train, the rest test.
    ///
    /// Train coverage is one contiguous arc of the trajectory.
    #[serde(rename = "prefix", alias = "contiguous")]
    ContiguousPrefix,
    /// Every `stride`-th sample trains, with `stride = round(n / round(n·f))`.
    ///
    /// Test views end up bracketed by train views. The train count only approximates
    /// `round(n·f)` because of the stride rounding.
    #[default]
    #[serde(rename = "stride", alias = "interleave")]
    StrideInterleave,
}

impl PartitionPolicy {
    /// Short name used in logs and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            PartitionPolicy::ContiguousPrefix => "prefix",
            PartitionPolicy::StrideInterleave => "stride",
        }
    }
}

/// Split label and per-split sequential index of one trajectory sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitSlot {
    /// Split the sample belongs to.
    pub split: Split,
    /// Index within the split, counting from 0 in traversal order.
    pub local_index: usize,
}

impl SplitSlot {
    /// Split-relative, extension-less file path (`train/r_0`).
    pub fn file_path(&self) -> String {
        self.split.frame_path(self.local_index)
    }
}

/// Split assignment for every global index of a trajectory.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitPlan {
    /// One slot per global index, in traversal order.
    pub slots: Vec<SplitSlot>,
    /// Train count the fraction asked for (`floor` or `round` of `n·f` depending on policy).
    pub requested_train: usize,
    /// Stride used by [`PartitionPolicy::StrideInterleave`].
    pub stride: Option<usize>,
}

impl SplitPlan {
    /// Number of samples assigned to `split`.
    pub fn count(&self, split: Split) -> usize {
        self.slots.iter().filter(|s| s.split == split).count()
    }
}

/// Assign each of `n` trajectory indices to a split.
pub fn plan_splits(
    n: usize,
    train_fraction: f64,
    policy: PartitionPolicy,
) -> OrbitsetResult<SplitPlan> {
    if !(train_fraction.is_finite() && (0.0..=1.0).contains(&train_fraction)) {
        return Err(OrbitsetError::config(format!(
            "train fraction must be within [0, 1], got {train_fraction}"
        )));
    }
    let scaled = (n as f64) * train_fraction;

    match policy {
        PartitionPolicy::ContiguousPrefix => {
            let num_train = scaled.floor() as usize;
            let slots = (0..n)
                .map(|i| {
                    if i < num_train {
                        SplitSlot {
                            split: Split::Train,
                            local_index: i,
                        }
                    } else {
                        SplitSlot {
                            split: Split::Test,
                            local_index: i - num_train,
                        }
                    }
                })
                .collect();
            Ok(SplitPlan {
                slots,
                requested_train: num_train,
                stride: None,
            })
        }
        PartitionPolicy::StrideInterleave => {
            let num_train = scaled.round() as usize;
            if num_train == 0 {
                return Err(OrbitsetError::config(format!(
                    "train fraction {train_fraction} of {n} samples rounds to zero train frames; \
                     stride is undefined"
                )));
            }
            let stride = ((n as f64) / (num_train as f64)).round().max(1.0) as usize;

            let mut next = [0usize; 2];
            let slots = (0..n)
                .map(|i| {
                    let split = if i % stride == 0 {
                        Split::Train
                    } else {
                        Split::Test
                    };
                    let counter = &mut next[split as usize];
                    let local_index = *counter;
                    *counter += 1;
                    SplitSlot { split, local_index }
                })
                .collect();
            Ok(SplitPlan {
                slots,
                requested_train: num_train,
                stride: Some(stride),
            })
        }
    }
}

/// An item tagged with its split and per-split index.
#[derive(Clone, Debug, PartialEq)]
pub struct Assigned<T> {
    /// Per-split index.
    pub local_index: usize,
    /// The partitioned item.
    pub item: T,
}

/// Items divided into train and test, each in traversal order.
#[derive(Clone, Debug, PartialEq)]
pub struct Partition<T> {
    /// Train items.
    pub train: Vec<Assigned<T>>,
    /// Test items.
    pub test: Vec<Assigned<T>>,
    /// Stride used, for the interleave policy.
    pub stride: Option<usize>,
}

impl<T> Partition<T> {
    /// Items of one split.
    pub fn split(&self, split: Split) -> &[Assigned<T>] {
        match split {
            Split::Train => &self.train,
            Split::Test => &self.test,
        }
    }
}

/// Partition an ordered sequence of items (normally poses) into train and test.
pub fn partition<T>(
    items: impl IntoIterator<Item = T>,
    train_fraction: f64,
    policy: PartitionPolicy,
) -> OrbitsetResult<Partition<T>> {
    let items: Vec<T> = items.into_iter().collect();
    let plan = plan_splits(items.len(), train_fraction, policy)?;

    let mut train = Vec::with_capacity(plan.count(Split::Train));
    let mut test = Vec::with_capacity(plan.count(Split::Test));
    for (slot, item) in plan.slots.iter().zip(items) {
        let assigned = Assigned {
            local_index: slot.local_index,
            item,
        };
        match slot.split {
            Split::Train => train.push(assigned),
            Split::Test => test.push(assigned),
        }
    }
    Ok(Partition {
        train,
        test,
        stride: plan.stride,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/partition.rs"]
mod tests;
