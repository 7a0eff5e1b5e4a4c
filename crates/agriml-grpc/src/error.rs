use agriml_domain::DomainError;
use tonic::Status;

/// Convert domain error to gRPC Status
pub fn domain_error_to_status(error: DomainError) -> Status {
    match error {
        DomainError::InvalidObservation(msg) | DomainError::InvalidReading(msg) => {
            Status::invalid_argument(msg)
        }

        DomainError::PublishError(err) => Status::internal(format!("Internal error: {}", err)),
    }
}
