//! Flow exit status table.

/// Known non-zero exit statuses of the `flow` binary.
///
/// Status 5 has no entry; it is reported as unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowStatus {
    ServerInitializing,
    TypeError,
    OutOfTime,
    KillError,
    NoServerRunning,
    OutOfRetries,
    InvalidFlowconfig,
    BuildIdMismatch,
    InputError,
    LockStolen,
    CouldNotFindFlowconfig,
    ServerOutOfDate,
    ServerClientDirectoryMismatch,
    OutOfSharedMemory,
}

impl FlowStatus {
    /// Every known status, in exit-code order.
    pub const ALL: [FlowStatus; 14] = [
        FlowStatus::ServerInitializing,
        FlowStatus::TypeError,
        FlowStatus::OutOfTime,
        FlowStatus::KillError,
        FlowStatus::NoServerRunning,
        FlowStatus::OutOfRetries,
        FlowStatus::InvalidFlowconfig,
        FlowStatus::BuildIdMismatch,
        FlowStatus::InputError,
        FlowStatus::LockStolen,
        FlowStatus::CouldNotFindFlowconfig,
        FlowStatus::ServerOutOfDate,
        FlowStatus::ServerClientDirectoryMismatch,
        FlowStatus::OutOfSharedMemory,
    ];

    /// Look up a status by exact exit code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(FlowStatus::ServerInitializing),
            2 => Some(FlowStatus::TypeError),
            3 => Some(FlowStatus::OutOfTime),
            4 => Some(FlowStatus::KillError),
            6 => Some(FlowStatus::NoServerRunning),
            7 => Some(FlowStatus::OutOfRetries),
            8 => Some(FlowStatus::InvalidFlowconfig),
            9 => Some(FlowStatus::BuildIdMismatch),
            10 => Some(FlowStatus::InputError),
            11 => Some(FlowStatus::LockStolen),
            12 => Some(FlowStatus::CouldNotFindFlowconfig),
            13 => Some(FlowStatus::ServerOutOfDate),
            14 => Some(FlowStatus::ServerClientDirectoryMismatch),
            15 => Some(FlowStatus::OutOfSharedMemory),
            _ => None,
        }
    }

    /// Exit code the `flow` binary uses for this status.
    pub fn code(&self) -> i32 {
        match self {
            FlowStatus::ServerInitializing => 1,
            FlowStatus::TypeError => 2,
            FlowStatus::OutOfTime => 3,
            FlowStatus::KillError => 4,
            FlowStatus::NoServerRunning => 6,
            FlowStatus::OutOfRetries => 7,
            FlowStatus::InvalidFlowconfig => 8,
            FlowStatus::BuildIdMismatch => 9,
            FlowStatus::InputError => 10,
            FlowStatus::LockStolen => 11,
            FlowStatus::CouldNotFindFlowconfig => 12,
            FlowStatus::ServerOutOfDate => 13,
            FlowStatus::ServerClientDirectoryMismatch => 14,
            FlowStatus::OutOfSharedMemory => 15,
        }
    }

    /// Human-readable category label.
    pub fn label(&self) -> &'static str {
        match self {
            FlowStatus::ServerInitializing => "Server Initializing",
            FlowStatus::TypeError => "Type Error",
            FlowStatus::OutOfTime => "Out of Time",
            FlowStatus::KillError => "Kill Error",
            FlowStatus::NoServerRunning => "No Server Running",
            FlowStatus::OutOfRetries => "Out of Retries",
            FlowStatus::InvalidFlowconfig => "Invalid Flowconfig",
            FlowStatus::BuildIdMismatch => "Build Id Mismatch",
            FlowStatus::InputError => "Input Error",
            FlowStatus::LockStolen => "Lock Stolen",
            FlowStatus::CouldNotFindFlowconfig => "Could Not Find Flowconfig",
            FlowStatus::ServerOutOfDate => "Server Out of Date",
            FlowStatus::ServerClientDirectoryMismatch => "Server Client Directory Mismatch",
            FlowStatus::OutOfSharedMemory => "Out of Shared Memory",
        }
    }
}

/// Category label for an exit code, or `None` when the code is not in the table.
pub fn category_for(code: i32) -> Option<&'static str> {
    FlowStatus::from_code(code).map(|s| s.label())
}
