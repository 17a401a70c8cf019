use super::common::{mark_gone, strings_value};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema, Validator};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::{Period, Timeframe};
use bastion_core::Error;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::LazyLock;

const IMPORT: ImportFormat = ImportFormat("<timeframe_name>");

const WEEK_DAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

static TIME_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[0-9]|1[0-9]|2[0-3]):[0-5][0-9]$").expect("TIME_FORMAT is a valid regex")
});

fn time() -> Validator {
    Validator::StringMatch {
        regex: &TIME_FORMAT,
        message: "Must respect the format `hh:mm`",
    }
}

/// `wallix-bastion_timeframe`, addressed by name.
pub(crate) struct TimeframeResource;

fn body(data: &ResourceData) -> Timeframe {
    Timeframe {
        timeframe_name: data.get_str("timeframe_name"),
        description: data.get_str("description"),
        is_overtimable: data.get_bool("is_overtimable"),
        periods: data
            .get_blocks("periods")
            .iter()
            .map(|p| Period {
                start_date: p.get_str("start_date"),
                end_date: p.get_str("end_date"),
                start_time: p.get_str("start_time"),
                end_time: p.get_str("end_time"),
                week_days: p.get_strings("week_days"),
            })
            .collect(),
    }
}

fn fill(data: &mut ResourceData, timeframe: &Timeframe) {
    data.set("timeframe_name", timeframe.timeframe_name.clone());
    data.set("description", timeframe.description.clone());
    data.set("is_overtimable", timeframe.is_overtimable);
    let periods: Vec<Value> = timeframe
        .periods
        .iter()
        .map(|p| {
            json!({
                "start_date": p.start_date,
                "end_date": p.end_date,
                "start_time": p.start_time,
                "end_time": p.end_time,
                "week_days": strings_value(&p.week_days),
            })
        })
        .collect();
    data.set("periods", periods);
}

#[async_trait]
impl Resource for TimeframeResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_timeframe"
    }

    fn schema(&self) -> Schema {
        let period = Schema::new()
            .attr(
                "start_date",
                Attribute::string().required().validate(Validator::IsDate),
            )
            .attr(
                "end_date",
                Attribute::string().required().validate(Validator::IsDate),
            )
            .attr("start_time", Attribute::string().required().validate(time()))
            .attr("end_time", Attribute::string().required().validate(time()))
            .attr(
                "week_days",
                Attribute::string_set()
                    .optional()
                    .validate(Validator::StringInSlice(WEEK_DAYS)),
            );

        Schema::new()
            .attr("timeframe_name", Attribute::string().required())
            .attr("description", Attribute::string().optional())
            .attr("is_overtimable", Attribute::bool().optional())
            .attr("periods", Attribute::block_set(period).optional())
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("timeframe_name");
        let timeframes = ctx.client().timeframes();
        if timeframes.get(&name).await?.is_some() {
            return Err(Error::Conflict(format!("timeframe_name {name} already exists")));
        }
        timeframes.create(&body(data)).await?;
        data.set_id(name);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        match ctx.client().timeframes().get(data.id()).await? {
            Some(timeframe) => fill(data, &timeframe),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.client()
            .timeframes()
            .update(data.id(), &body(data))
            .await?;
        // a rename moves the object
        data.set_id(data.get_str("timeframe_name"));
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        ctx.client().timeframes().delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let timeframe = ctx
            .client()
            .timeframes()
            .get(&parts[0])
            .await?
            .ok_or_else(|| IMPORT.not_found("timeframe_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(timeframe.timeframe_name.clone());
        fill(&mut data, &timeframe);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_are_checked() {
        let schema = TimeframeResource.schema();
        let Value::Object(config) = json!({
            "timeframe_name": "office",
            "periods": [{
                "start_date": "2024-02-30",
                "end_date": "2024-12-31",
                "start_time": "08:00",
                "end_time": "24:00",
                "week_days": ["monday", "funday"]
            }]
        }) else {
            unreachable!()
        };
        let err = schema.validate(&config).unwrap_err().to_string();
        assert!(err.contains("periods.0.start_date"));
        assert!(!err.contains("periods.0.end_date"));
        assert!(err.contains("periods.0.end_time"));
        assert!(!err.contains("periods.0.start_time"));
        assert!(err.contains("got funday"));
    }

    #[test]
    fn time_pattern_is_compiled_once() {
        let Validator::StringMatch { regex: first, .. } = time() else {
            unreachable!()
        };
        let Validator::StringMatch { regex: second, .. } = time() else {
            unreachable!()
        };
        assert!(std::ptr::eq(first, second));
        assert!(first.is_match("23:59"));
        assert!(!second.is_match("7:05"));
    }
}
