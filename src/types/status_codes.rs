// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! The table of named status codes. Each entry becomes an associated constant on `StatusCode`
//! and an entry in the name / description lookup used by `Display`.

use crate::types::status_code::StatusCode;

macro_rules! status_codes {
    ( $( $name:ident = $value:literal, $description:literal; )* ) => {
        #[allow(non_upper_case_globals)]
        impl StatusCode {
            $(
                #[doc = $description]
                pub const $name: StatusCode = StatusCode::from_bits($value);
            )*
        }

        /// Finds the symbolic name and description of a status code, ignoring its info bits.
        pub(crate) fn lookup(code: u32) -> Option<(&'static str, &'static str)> {
            match code {
                $( $value => Some((stringify!($name), $description)), )*
                _ => None,
            }
        }
    };
}

status_codes! {
    Good = 0x0000_0000, "The operation completed successfully.";
    Uncertain = 0x4000_0000, "The operation completed however its outputs may not be usable.";
    Bad = 0x8000_0000, "The operation failed.";
    GoodOverload = 0x002F_0000, "Sampling has slowed down due to resource limitations.";
    GoodClamped = 0x0030_0000, "The value written was accepted but was clamped.";
    GoodNoData = 0x00A5_0000, "No data exists for the requested time range or event filter.";
    GoodMoreData = 0x00A6_0000, "The data or event field was successfully replaced in the historical database.";
    UncertainNoCommunicationLastUsableValue = 0x408F_0000, "Communication to the data source has failed. The variable value is the last value that had a good quality.";
    UncertainLastUsableValue = 0x4090_0000, "Whatever was updating this value has stopped doing so.";
    UncertainSubstituteValue = 0x4091_0000, "The value is an operational value that was manually overwritten.";
    UncertainInitialValue = 0x4092_0000, "The value is an initial value for a variable that normally receives its value from another variable.";
    BadUnexpectedError = 0x8001_0000, "An unexpected error occurred.";
    BadInternalError = 0x8002_0000, "An internal error occurred as a result of a programming or configuration error.";
    BadOutOfMemory = 0x8003_0000, "Not enough memory to complete the operation.";
    BadResourceUnavailable = 0x8004_0000, "An operating system resource is not available.";
    BadCommunicationError = 0x8005_0000, "A low level communication error occurred.";
    BadEncodingError = 0x8006_0000, "Encoding halted because of invalid data in the objects being serialized.";
    BadDecodingError = 0x8007_0000, "Decoding halted because of invalid data in the stream.";
    BadEncodingLimitsExceeded = 0x8008_0000, "The message encoding/decoding limits imposed by the stack have been exceeded.";
    BadUnknownResponse = 0x8009_0000, "An unrecognized response was received from the server.";
    BadTimeout = 0x800A_0000, "The operation timed out.";
    BadServiceUnsupported = 0x800B_0000, "The server does not support the requested service.";
    BadShutdown = 0x800C_0000, "The operation was cancelled because the application is shutting down.";
    BadNothingToDo = 0x800F_0000, "There was nothing to do because the client passed a list of operations with no elements.";
    BadTooManyOperations = 0x8010_0000, "The request could not be processed because it specified too many operations.";
    BadDataTypeIdUnknown = 0x8011_0000, "The extension object cannot be (de)serialized because the data type id is not recognized.";
    BadWaitingForInitialData = 0x8032_0000, "Waiting for the server to obtain values from the underlying data source.";
    BadNodeIdInvalid = 0x8033_0000, "The syntax of the node id is not valid.";
    BadNodeIdUnknown = 0x8034_0000, "The node id refers to a node that does not exist in the server address space.";
    BadAttributeIdInvalid = 0x8035_0000, "The attribute is not supported for the specified Node.";
    BadIndexRangeInvalid = 0x8036_0000, "The syntax of the index range parameter is invalid.";
    BadIndexRangeNoData = 0x8037_0000, "No data exists within the range of indexes specified.";
    BadDataEncodingInvalid = 0x8038_0000, "The data encoding is invalid.";
    BadNotReadable = 0x803A_0000, "The access level does not allow reading or subscribing to the Node.";
    BadNotWritable = 0x803B_0000, "The access level does not allow writing to the Node.";
    BadOutOfRange = 0x803C_0000, "The value was out of range.";
    BadNotSupported = 0x803D_0000, "The requested operation is not supported.";
    BadNotFound = 0x803E_0000, "A requested item was not found or a search operation ended without success.";
    BadNoMatch = 0x806F_0000, "The requested operation has no match to return.";
    BadTypeMismatch = 0x8074_0000, "The value supplied for the attribute is not of the same type as the attribute's value.";
    BadConfigurationError = 0x8089_0000, "There is a problem with the configuration that affects the usefulness of the value.";
    BadOutOfService = 0x808D_0000, "The source of the data is not operational.";
    BadNoData = 0x809B_0000, "No data exists for the requested time range or event filter.";
    BadInvalidArgument = 0x80AB_0000, "One or more arguments are invalid.";
    BadConnectionRejected = 0x80AC_0000, "Could not establish a network connection to remote server.";
    BadDisconnect = 0x80AD_0000, "The server has disconnected from the client.";
    BadConnectionClosed = 0x80AE_0000, "The network connection has been closed.";
    BadInvalidState = 0x80AF_0000, "The operation cannot be completed because the object is closed, uninitialized or in some other invalid state.";
    BadEndOfStream = 0x80B0_0000, "Cannot move beyond end of the stream.";
    BadWouldBlock = 0x80B5_0000, "Non blocking behaviour is required and the operation would block.";
}
