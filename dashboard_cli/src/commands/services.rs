//! Services command - list swarm services.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use dashboard_shared_types::ServiceInfo;

use crate::client::{ApiClient, SERVICES_PATH};
use crate::output::print_data;
use crate::OutputFormat;

/// Arguments for the services command.
#[derive(Args)]
pub struct ServicesArgs {
    /// Filter by service name
    #[arg(short, long)]
    name: Option<String>,
}

/// A service as shown in tables.
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct ServiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Replicas")]
    replicas: String,
}

impl From<ServiceInfo> for ServiceRow {
    fn from(service: ServiceInfo) -> Self {
        Self {
            id: service.id,
            name: service.name,
            replicas: service.replicas,
        }
    }
}

pub(crate) fn service_rows(services: Vec<ServiceInfo>, name: Option<&str>) -> Vec<ServiceRow> {
    services
        .into_iter()
        .filter(|s| name.map_or(true, |n| s.name.contains(n)))
        .map(ServiceRow::from)
        .collect()
}

/// Execute the services command.
pub async fn execute(
    args: ServicesArgs,
    api_url: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let client = ApiClient::new(api_url)?;
    let services: Vec<ServiceInfo> = client.get(SERVICES_PATH).await?;

    print_data(&service_rows(services, args.name.as_deref()), format)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_name_filter() {
        let services = vec![
            ServiceInfo {
                id: "s1".to_string(),
                name: "web".to_string(),
                replicas: "5".to_string(),
            },
            ServiceInfo {
                id: "s2".to_string(),
                name: "ingress".to_string(),
                replicas: "Global / Unknown".to_string(),
            },
        ];

        let rows = service_rows(services, Some("ingr"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "s2");
    }

    #[tokio::test]
    async fn test_api_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SERVICES_PATH))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"error": "Failed to fetch services"})),
            )
            .mount(&server)
            .await;

        let args = ServicesArgs { name: None };
        let err = execute(args, &server.uri(), OutputFormat::Table)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to fetch services"));
    }
}
