use std::env;
use std::time::Duration;

/// Region used when nothing else is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Configuration for the STS client and its HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// STS API endpoint URL.
    pub endpoint: String,

    /// Region the endpoint belongs to.
    pub region: String,

    /// Overall HTTP request timeout, unless a call overrides it.
    pub timeout: Duration,

    /// TCP connect timeout.
    pub connect_timeout: Duration,

    /// `User-Agent` sent with every request.
    pub user_agent: String,

    /// API version (always "2011-06-15").
    pub(crate) api_version: &'static str,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: regional_endpoint(DEFAULT_REGION),
            region: DEFAULT_REGION.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("rs-aws-sts/", env!("CARGO_PKG_VERSION")).to_string(),
            api_version: "2011-06-15",
        }
    }
}

impl ClientConfig {
    /// Builds a configuration from the standard AWS environment variables.
    ///
    /// Region comes from `AWS_REGION`, then `AWS_DEFAULT_REGION`. The endpoint
    /// comes from `AWS_ENDPOINT_URL_STS`, then `AWS_ENDPOINT_URL`, and is
    /// otherwise derived from the region.
    pub fn from_env() -> Self {
        let config = match non_empty_var("AWS_REGION").or_else(|| non_empty_var("AWS_DEFAULT_REGION"))
        {
            Some(region) => Self::default().with_region(region),
            None => Self::default(),
        };
        match non_empty_var("AWS_ENDPOINT_URL_STS").or_else(|| non_empty_var("AWS_ENDPOINT_URL")) {
            Some(endpoint) => config.with_endpoint(endpoint),
            None => config,
        }
    }

    /// Sets the region and points the endpoint at that region's STS.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self.endpoint = regional_endpoint(&self.region);
        self
    }

    /// Overrides the endpoint, e.g. for a VPC endpoint or a local stub.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the HTTP request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the TCP connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn regional_endpoint(region: &str) -> String {
    let suffix = if region.starts_with("cn-") {
        "amazonaws.com.cn"
    } else {
        "amazonaws.com"
    };
    format!("https://sts.{}.{}", region, suffix)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
