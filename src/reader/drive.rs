use crate::decompress::Status;

/// Where the drive loop stands between two engine steps
///
/// ```text
///   NeedInput --pull--> HaveInput --step--> NeedInput | HaveInput | OutputFull
///   OutputFull --next read--> step without pulling
/// ```
///
/// `OutputFull` survives across read calls: the engine may still hold
/// output for input it has already consumed, so the next call steps it
/// again before asking the source for more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum DriveState {
    #[default]
    NeedInput,
    HaveInput,
    OutputFull
}

impl DriveState {
    /// The state at the top of a loop iteration, given how many staged
    /// bytes the engine has not consumed yet
    pub(crate) fn resume(self, buffered: usize) -> Self {
        match self {
            Self::OutputFull => Self::OutputFull,
            _ if buffered > 0 => Self::HaveInput,
            _ => Self::NeedInput
        }
    }

    /// Whether this iteration refills the staging buffer from the source
    pub(crate) fn pulls(self) -> bool {
        self == Self::NeedInput
    }

    pub(crate) fn after_step(status: Status, output_space: usize, buffered: usize) -> Self {
        if status == Status::Ok && output_space == 0 {
            Self::OutputFull
        } else if buffered > 0 {
            Self::HaveInput
        } else {
            Self::NeedInput
        }
    }
}
