//! Compute adapter: drives the `aws` CLI through the `CommandRunner` port.
//!
//! Every call shells out with `--output json` and parses the documented
//! response shape. A non-zero exit becomes a [`ServiceError`] carrying the
//! CLI's service code and detail when present.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::application::ports::{
    CommandRunner, ImageCatalog, ImageSummary, InstanceLifecycle, NetworkDiscovery,
};
use crate::domain::{LaunchSpec, ServiceError};

/// Catalog vendor whose images are considered.
pub const IMAGE_OWNER: &str = "amazon";

/// Run one `aws` CLI invocation and parse its JSON stdout.
pub(crate) async fn run_aws<R, T>(runner: &R, args: &[&str]) -> Result<T>
where
    R: CommandRunner + ?Sized,
    T: DeserializeOwned,
{
    let output = check_aws(runner, args).await?;
    serde_json::from_slice(&output.stdout).context("parsing aws CLI output")
}

/// Run one `aws` CLI invocation for its side effect, discarding stdout.
pub(crate) async fn run_aws_void<R>(runner: &R, args: &[&str]) -> Result<()>
where
    R: CommandRunner + ?Sized,
{
    check_aws(runner, args).await.map(|_| ())
}

async fn check_aws<R>(runner: &R, args: &[&str]) -> Result<std::process::Output>
where
    R: CommandRunner + ?Sized,
{
    let output = runner.run("aws", args).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ServiceError::from_cli_stderr(&stderr).into());
    }
    Ok(output)
}

pub struct AwsCliCompute<R: CommandRunner> {
    runner: R,
    region: String,
}

impl<R: CommandRunner> AwsCliCompute<R> {
    pub fn new(runner: R, region: impl Into<String>) -> Self {
        Self {
            runner,
            region: region.into(),
        }
    }

    async fn ec2<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        run_aws(&self.runner, &self.ec2_args(args)).await
    }

    async fn ec2_void(&self, args: &[&str]) -> Result<()> {
        run_aws_void(&self.runner, &self.ec2_args(args)).await
    }

    fn ec2_args<'a>(&'a self, args: &[&'a str]) -> Vec<&'a str> {
        let mut full = vec!["ec2"];
        full.extend_from_slice(args);
        full.extend_from_slice(&["--region", &self.region, "--output", "json"]);
        full
    }
}

// ── Response shapes ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeImages {
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Image {
    image_id: String,
    #[serde(default)]
    creation_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeVpcs {
    #[serde(default)]
    vpcs: Vec<Vpc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Vpc {
    vpc_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeSubnets {
    #[serde(default)]
    subnets: Vec<Subnet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Subnet {
    subnet_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeSecurityGroups {
    #[serde(default)]
    security_groups: Vec<SecurityGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SecurityGroup {
    group_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RunInstances {
    #[serde(default)]
    instances: Vec<Instance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Instance {
    instance_id: String,
}

// ── Port implementations ──────────────────────────────────────────────────────

#[async_trait]
impl<R: CommandRunner> ImageCatalog for AwsCliCompute<R> {
    async fn images_by_name(&self, pattern: &str) -> Result<Vec<ImageSummary>> {
        let name_filter = format!("Name=name,Values={pattern}");
        let response: DescribeImages = self
            .ec2(&[
                "describe-images",
                "--owners",
                IMAGE_OWNER,
                "--filters",
                &name_filter,
                "Name=state,Values=available",
            ])
            .await
            .context("describe-images")?;
        Ok(response
            .images
            .into_iter()
            .map(|image| ImageSummary {
                image_id: image.image_id,
                creation_date: image.creation_date,
            })
            .collect())
    }
}

#[async_trait]
impl<R: CommandRunner> NetworkDiscovery for AwsCliCompute<R> {
    async fn default_network(&self) -> Result<Option<String>> {
        let response: DescribeVpcs = self
            .ec2(&["describe-vpcs", "--filters", "Name=isDefault,Values=true"])
            .await
            .context("describe-vpcs")?;
        Ok(response.vpcs.into_iter().next().map(|vpc| vpc.vpc_id))
    }

    async fn subnets_of(&self, network_id: &str) -> Result<Vec<String>> {
        let filter = format!("Name=vpc-id,Values={network_id}");
        let response: DescribeSubnets = self
            .ec2(&["describe-subnets", "--filters", &filter])
            .await
            .context("describe-subnets")?;
        Ok(response
            .subnets
            .into_iter()
            .map(|subnet| subnet.subnet_id)
            .collect())
    }

    async fn boundary_named(&self, network_id: &str, name: &str) -> Result<Option<String>> {
        let vpc_filter = format!("Name=vpc-id,Values={network_id}");
        let name_filter = format!("Name=group-name,Values={name}");
        let response: DescribeSecurityGroups = self
            .ec2(&[
                "describe-security-groups",
                "--filters",
                &vpc_filter,
                &name_filter,
            ])
            .await
            .context("describe-security-groups")?;
        Ok(response
            .security_groups
            .into_iter()
            .next()
            .map(|group| group.group_id))
    }
}

#[async_trait]
impl<R: CommandRunner> InstanceLifecycle for AwsCliCompute<R> {
    async fn launch(&self, spec: &LaunchSpec) -> Result<String> {
        let mut args = vec![
            "run-instances",
            "--image-id",
            &spec.image_id,
            "--instance-type",
            &spec.instance_type,
            "--subnet-id",
            &spec.subnet_id,
            "--security-group-ids",
            &spec.boundary_id,
            "--count",
            "1",
        ];
        // Absent key reference must not inject any key material.
        if let Some(key) = &spec.key_name {
            args.push("--key-name");
            args.push(key);
        }
        let response: RunInstances = self.ec2(&args).await.context("run-instances")?;
        response
            .instances
            .into_iter()
            .next()
            .map(|instance| instance.instance_id)
            .ok_or_else(|| anyhow::anyhow!("run-instances returned no instance"))
    }

    async fn terminate(&self, instance_ids: &[String]) -> Result<()> {
        let mut args = vec!["terminate-instances", "--instance-ids"];
        args.extend(instance_ids.iter().map(String::as_str));
        self.ec2_void(&args).await.context("terminate-instances")
    }

    async fn tag(&self, instance_id: &str, key: &str, value: &str) -> Result<()> {
        let tag = format!("Key={key},Value={value}");
        self.ec2_void(&["create-tags", "--resources", instance_id, "--tags", &tag])
            .await
            .context("create-tags")
    }
}
