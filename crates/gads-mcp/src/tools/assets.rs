//! Performance Max text assets.
//!
//! New assets and their asset-group links travel in the same batch: each
//! asset gets a temporary resource name that its link operation references.

use std::fmt::Write;

use gads_core::markdown::field;
use gads_core::{AdsError, BatchResult, MutateBatch, Report, Service};
use gads_transport::AdsApi;
use gads_types::{AssetFieldType, CustomerId};
use serde_json::{json, Value};

use super::inputs::{CreateTextAssetsInput, RemoveAssetFromGroupInput, UpdateAssetGroupAssetsInput};
use super::{customer, submit};

/// Queue a text asset and its link into `asset_group` under `field_type`.
pub(crate) fn link_text_asset(
    batch: &mut MutateBatch,
    asset_group: &str,
    field_type: AssetFieldType,
    text: &str,
) {
    let asset_rn = batch.temp_resource(Service::Asset);
    batch.create(
        Service::Asset,
        format!("{} asset '{}'", field_type, text),
        json!({
            "resourceName": asset_rn,
            "type": "TEXT",
            "textAsset": {"text": text},
        }),
    );
    batch.create(
        Service::AssetGroupAsset,
        format!("{} link for '{}'", field_type, text),
        json!({
            "assetGroup": asset_group,
            "asset": asset_rn,
            "fieldType": field_type.as_str(),
        }),
    );
}

/// `assetGroupAssets` resource name from a full name or `<ag>~<asset>~<FIELD>`.
fn asset_group_asset_name(id: &CustomerId, raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("customers/") {
        raw.to_string()
    } else {
        id.asset_group_asset(raw)
    }
}

fn names_in(result: &BatchResult, collection: &str) -> Vec<String> {
    let marker = format!("/{}/", collection);
    result
        .resource_names()
        .into_iter()
        .filter(|name| name.contains(&marker))
        .collect()
}

/// Text grouped by field, in the order the caller supplied it.
struct TextAssets<'a> {
    headlines: &'a [String],
    descriptions: &'a [String],
    long_headlines: &'a [String],
    business_name: Option<&'a str>,
}

impl TextAssets<'_> {
    fn queue(&self, batch: &mut MutateBatch, asset_group: &str) -> usize {
        let entries = self
            .headlines
            .iter()
            .map(|t| (AssetFieldType::Headline, t.as_str()))
            .chain(self.descriptions.iter().map(|t| (AssetFieldType::Description, t.as_str())))
            .chain(self.long_headlines.iter().map(|t| (AssetFieldType::LongHeadline, t.as_str())))
            .chain(self.business_name.map(|t| (AssetFieldType::BusinessName, t)));
        let mut count = 0;
        for (field_type, text) in entries {
            link_text_asset(batch, asset_group, field_type, text);
            count += 1;
        }
        count
    }

    fn summary(&self) -> Value {
        json!({
            "headlines": self.headlines,
            "descriptions": self.descriptions,
            "long_headlines": self.long_headlines,
            "business_name": self.business_name,
        })
    }

    fn render(&self, md: &mut String) {
        let sections = [
            ("Headlines", self.headlines),
            ("Descriptions", self.descriptions),
            ("Long Headlines", self.long_headlines),
        ];
        for (title, texts) in sections {
            if texts.is_empty() {
                continue;
            }
            let _ = writeln!(md, "### {} ({})", title, texts.len());
            for text in texts {
                let _ = writeln!(md, "- {}", text);
            }
            md.push('\n');
        }
        if let Some(name) = self.business_name {
            let _ = writeln!(md, "### Business Name\n- {}\n", name);
        }
    }
}

pub(crate) fn create_text_assets(api: &dyn AdsApi, p: CreateTextAssetsInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let asset_group = id.asset_group(&p.asset_group_id);
    let texts = TextAssets {
        headlines: &p.headlines,
        descriptions: &p.descriptions,
        long_headlines: &p.long_headlines,
        business_name: p.business_name.as_deref(),
    };

    let mut batch = MutateBatch::new(id);
    let created = texts.queue(&mut batch, &asset_group);
    let result = submit(api, &batch)?;

    let mut md = String::from("✅ **Text assets created and added to asset group successfully!**\n\n");
    field(&mut md, "Asset Group ID", &p.asset_group_id);
    field(&mut md, "Total Assets Created", created);
    md.push('\n');
    texts.render(&mut md);
    md.push_str("**Status**: Assets are pending Google review (usually within 1 business day)\n");
    md.push_str(
        "\n**Next Steps**:\n\
         1. Monitor asset approval status with `google_ads_get_asset_performance`\n\
         2. Remove disapproved assets if any\n\
         3. Wait 24-48 hours for performance labels to appear\n",
    );

    Ok(Report::new(
        md,
        json!({
            "asset_group_id": p.asset_group_id,
            "total_created": created,
            "assets": texts.summary(),
            "asset_resource_names": names_in(&result, "assets"),
            "asset_group_asset_resource_names": names_in(&result, "assetGroupAssets"),
        }),
    ))
}

pub(crate) fn remove_asset_from_group(
    api: &dyn AdsApi,
    p: RemoveAssetFromGroupInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let mut batch = MutateBatch::new(id.clone());
    let names: Vec<String> = p
        .asset_group_asset_ids
        .iter()
        .map(|raw| asset_group_asset_name(&id, raw))
        .collect();
    for name in &names {
        batch.remove(Service::AssetGroupAsset, format!("unlink {}", name), name);
    }
    let result = submit(api, &batch)?;

    let mut md = format!(
        "✅ **Removed {} asset(s) from asset group successfully!**\n\n",
        names.len()
    );
    field(&mut md, "Removed Assets", result.len());
    md.push_str(
        "\nThe assets have been unlinked from the asset group. The campaign will stop using them immediately.\n\n\
         **Note**: The assets themselves remain in your account library and can be reused in other campaigns.\n",
    );

    Ok(Report::new(
        md,
        json!({
            "removed": result.len(),
            "asset_group_asset_resource_names": names,
        }),
    ))
}

pub(crate) fn update_asset_group_assets(
    api: &dyn AdsApi,
    p: UpdateAssetGroupAssetsInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let asset_group = id.asset_group(&p.asset_group_id);
    let texts = TextAssets {
        headlines: &p.add_headlines,
        descriptions: &p.add_descriptions,
        long_headlines: &[],
        business_name: None,
    };

    let mut batch = MutateBatch::new(id.clone());
    let added = texts.queue(&mut batch, &asset_group);
    let removed: Vec<String> = p
        .remove_asset_group_asset_ids
        .iter()
        .map(|raw| asset_group_asset_name(&id, raw))
        .collect();
    for name in &removed {
        batch.remove(Service::AssetGroupAsset, format!("unlink {}", name), name);
    }
    let result = submit(api, &batch)?;

    let mut md = String::from("✅ **Asset group updated successfully!**\n\n");
    field(&mut md, "Asset Group ID", &p.asset_group_id);
    let _ = writeln!(md, "\nAll {} operations were applied in a single atomic request.\n", batch.len());
    if added > 0 {
        let _ = writeln!(md, "### Added Assets ({})", added);
        if !p.add_headlines.is_empty() {
            field(&mut md, "Headlines", p.add_headlines.join(", "));
        }
        if !p.add_descriptions.is_empty() {
            field(&mut md, "Descriptions", p.add_descriptions.join(", "));
        }
        md.push('\n');
    }
    if !removed.is_empty() {
        let _ = writeln!(md, "### Removed Assets ({})", removed.len());
        for name in &removed {
            let _ = writeln!(md, "- {}", name);
        }
        md.push('\n');
    }
    md.push_str(
        "**Next Steps**:\n\
         1. Verify new assets are approved with `google_ads_get_asset_performance`\n\
         2. Monitor campaign performance for impact\n",
    );

    Ok(Report::new(
        md,
        json!({
            "asset_group_id": p.asset_group_id,
            "operations": batch.len(),
            "added": {
                "total_created": added,
                "assets": texts.summary(),
                "asset_resource_names": names_in(&result, "assets"),
                "asset_group_asset_resource_names": names_in(&result, "assetGroupAssets"),
            },
            "removed": removed,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid() -> CustomerId {
        CustomerId::parse("1234567890").unwrap()
    }

    #[test]
    fn test_asset_and_link_share_temp_name() {
        let mut batch = MutateBatch::new(cid());
        link_text_asset(
            &mut batch,
            "customers/1234567890/assetGroups/55",
            AssetFieldType::Headline,
            "Fast Repairs",
        );
        let ops = batch.operations();
        assert_eq!(ops.len(), 2);
        let asset = &ops[0]["assetOperation"]["create"];
        let link = &ops[1]["assetGroupAssetOperation"]["create"];
        assert_eq!(asset["textAsset"]["text"], "Fast Repairs");
        assert_eq!(link["asset"], asset["resourceName"]);
        assert_eq!(link["fieldType"], "HEADLINE");
        assert_eq!(asset["resourceName"], "customers/1234567890/assets/-1");
    }

    #[test]
    fn test_asset_group_asset_names() {
        let id = cid();
        assert_eq!(
            asset_group_asset_name(&id, "55~66~HEADLINE"),
            "customers/1234567890/assetGroupAssets/55~66~HEADLINE"
        );
        let full = "customers/1234567890/assetGroupAssets/55~66~DESCRIPTION";
        assert_eq!(asset_group_asset_name(&id, full), full);
    }

    #[test]
    fn test_queue_orders_fields() {
        let headlines = vec!["H1".to_string()];
        let descriptions = vec!["D1".to_string()];
        let texts = TextAssets {
            headlines: &headlines,
            descriptions: &descriptions,
            long_headlines: &[],
            business_name: Some("Acme"),
        };
        let mut batch = MutateBatch::new(cid());
        assert_eq!(texts.queue(&mut batch, "customers/1234567890/assetGroups/1"), 3);
        let fields: Vec<&str> = batch
            .operations()
            .iter()
            .filter_map(|op| op["assetGroupAssetOperation"]["create"]["fieldType"].as_str())
            .collect();
        assert_eq!(fields, vec!["HEADLINE", "DESCRIPTION", "BUSINESS_NAME"]);
    }
}
