use kit::domain_error;

#[domain_error(status = 404)]
pub struct WorkflowNotFound;

#[domain_error(status = 404)]
pub struct AgentNotFound;

#[domain_error(status = 400, message = "No update data provided")]
pub struct NoUpdateData;

#[cfg(test)]
mod tests {
    use super::*;
    use kit::FrameworkError;

    #[test]
    fn test_messages_and_status() {
        let err: FrameworkError = WorkflowNotFound.into();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Workflow not found");

        let err: FrameworkError = NoUpdateData.into();
        assert_eq!(err.to_json(), kit::serde_json::json!({ "detail": "No update data provided" }));
    }
}
