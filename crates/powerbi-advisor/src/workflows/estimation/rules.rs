use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{
    DataInfrastructure, DataVolume, DeploymentModel, Industry, ItTeamCapacity, LicenseType,
    Timeline,
};

pub const STANDARD_RULES_VERSION: &str = "2024.1";

/// Multiplier applied when an option has no entry in its table.
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

/// Versioned lookup tables and unit rates consumed by the estimation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesTable {
    pub version: String,
    pub industry_multipliers: BTreeMap<Industry, f64>,
    pub infrastructure_multipliers: BTreeMap<DataInfrastructure, f64>,
    pub timeline_multipliers: BTreeMap<Timeline, f64>,
    pub it_team_multipliers: BTreeMap<ItTeamCapacity, f64>,
    pub data_volume_surcharges: BTreeMap<DataVolume, f64>,
    pub deployment_surcharges: BTreeMap<DeploymentModel, f64>,
    pub timeline_base_weeks: BTreeMap<Timeline, u32>,
    pub rates: PricingRates,
    pub schedule: ScheduleRules,
    pub tiers: TierThresholds,
}

/// Unit prices for the additive parts of the estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRates {
    /// Monthly price per user, keyed by plan. Plans without an entry cost nothing.
    pub license_monthly_per_user: BTreeMap<LicenseType, f64>,
    pub premium_capacity_monthly: f64,
    pub months_per_year: f64,
    pub per_report: f64,
    pub per_data_source: f64,
    pub per_integration: f64,
    pub per_security_requirement: f64,
    pub ai_features: f64,
    pub comprehensive_training_per_user: f64,
    pub standard_training_per_user: f64,
    /// Share of development plus infrastructure charged as yearly maintenance.
    pub maintenance_rate: f64,
    pub annual_savings_per_user: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRules {
    pub default_base_weeks: u32,
    pub reports_per_milestone: u32,
    pub weeks_per_milestone: u32,
    pub weeks_per_integration: u32,
}

/// Scale limits that push a project into a larger package. Exceeding any one
/// of them is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierLimits {
    pub users: u32,
    pub reports: u32,
    pub integrations: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierThresholds {
    pub enterprise: TierLimits,
    pub professional: TierLimits,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            enterprise: TierLimits {
                users: 250,
                reports: 30,
                integrations: 5,
            },
            professional: TierLimits {
                users: 100,
                reports: 15,
                integrations: 2,
            },
        }
    }
}

impl RulesTable {
    /// Tables used by the public calculator.
    pub fn standard() -> Self {
        let industry_multipliers = BTreeMap::from([
            (Industry::Retail, 1.0),
            (Industry::Healthcare, 1.4),
            (Industry::Manufacturing, 1.2),
            (Industry::Finance, 1.5),
            (Industry::Education, 0.9),
            (Industry::Government, 1.3),
            (Industry::Technology, 1.1),
            (Industry::Logistics, 1.2),
            (Industry::Energy, 1.3),
            (Industry::RealEstate, 1.1),
        ]);

        let infrastructure_multipliers = BTreeMap::from([
            (DataInfrastructure::Excel, 1.0),
            (DataInfrastructure::Sql, 1.2),
            (DataInfrastructure::Cloud, 1.1),
            (DataInfrastructure::Apis, 1.4),
            (DataInfrastructure::Mixed, 1.5),
            (DataInfrastructure::Hybrid, 1.3),
        ]);

        let timeline_multipliers = BTreeMap::from([
            (Timeline::Asap, 1.6),
            (Timeline::OneToThreeMonths, 1.3),
            (Timeline::ThreeToSixMonths, 1.0),
            (Timeline::SixToTwelveMonths, 0.9),
            (Timeline::OverTwelveMonths, 0.8),
        ]);

        let it_team_multipliers = BTreeMap::from([
            (ItTeamCapacity::NoTeam, 1.4),
            (ItTeamCapacity::Limited, 1.2),
            (ItTeamCapacity::Moderate, 1.0),
            (ItTeamCapacity::Extensive, 0.8),
            (ItTeamCapacity::Outsourced, 1.1),
        ]);

        // Small and medium volumes carry no surcharge.
        let data_volume_surcharges = BTreeMap::from([
            (DataVolume::Large, 2000.0),
            (DataVolume::VeryLarge, 5000.0),
            (DataVolume::Enterprise, 10000.0),
        ]);

        let deployment_surcharges = BTreeMap::from([
            (DeploymentModel::Cloud, 1500.0),
            (DeploymentModel::OnPremise, 8000.0),
            (DeploymentModel::Hybrid, 4000.0),
        ]);

        let timeline_base_weeks = BTreeMap::from([
            (Timeline::Asap, 8),
            (Timeline::OneToThreeMonths, 10),
            (Timeline::ThreeToSixMonths, 12),
            (Timeline::SixToTwelveMonths, 20),
            (Timeline::OverTwelveMonths, 30),
        ]);

        Self {
            version: STANDARD_RULES_VERSION.to_string(),
            industry_multipliers,
            infrastructure_multipliers,
            timeline_multipliers,
            it_team_multipliers,
            data_volume_surcharges,
            deployment_surcharges,
            timeline_base_weeks,
            rates: PricingRates {
                license_monthly_per_user: BTreeMap::from([
                    (LicenseType::Pro, 10.0),
                    (LicenseType::PremiumPerUser, 20.0),
                ]),
                premium_capacity_monthly: 5000.0,
                months_per_year: 12.0,
                per_report: 2500.0,
                per_data_source: 2000.0,
                per_integration: 5000.0,
                per_security_requirement: 3000.0,
                ai_features: 15000.0,
                comprehensive_training_per_user: 75.0,
                standard_training_per_user: 35.0,
                maintenance_rate: 0.2,
                annual_savings_per_user: 2500.0,
            },
            schedule: ScheduleRules {
                default_base_weeks: 12,
                reports_per_milestone: 5,
                weeks_per_milestone: 2,
                weeks_per_integration: 1,
            },
            tiers: TierThresholds::default(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RulesError> {
        let table: Self = serde_json::from_reader(reader)?;
        table.validate()?;
        Ok(table)
    }

    /// Rejects negative or non-finite factors and rates.
    pub fn validate(&self) -> Result<(), RulesError> {
        check_values("industryMultipliers", &self.industry_multipliers)?;
        check_values("infrastructureMultipliers", &self.infrastructure_multipliers)?;
        check_values("timelineMultipliers", &self.timeline_multipliers)?;
        check_values("itTeamMultipliers", &self.it_team_multipliers)?;
        check_values("dataVolumeSurcharges", &self.data_volume_surcharges)?;
        check_values("deploymentSurcharges", &self.deployment_surcharges)?;
        check_values(
            "rates.licenseMonthlyPerUser",
            &self.rates.license_monthly_per_user,
        )?;

        let rates = &self.rates;
        let scalars = [
            ("premiumCapacityMonthly", rates.premium_capacity_monthly),
            ("monthsPerYear", rates.months_per_year),
            ("perReport", rates.per_report),
            ("perDataSource", rates.per_data_source),
            ("perIntegration", rates.per_integration),
            ("perSecurityRequirement", rates.per_security_requirement),
            ("aiFeatures", rates.ai_features),
            (
                "comprehensiveTrainingPerUser",
                rates.comprehensive_training_per_user,
            ),
            ("standardTrainingPerUser", rates.standard_training_per_user),
            ("maintenanceRate", rates.maintenance_rate),
            ("annualSavingsPerUser", rates.annual_savings_per_user),
        ];
        for (field, value) in scalars {
            check_value("rates", field, value)?;
        }

        if self.schedule.reports_per_milestone == 0 {
            return Err(RulesError::InvalidValue {
                field: "schedule.reportsPerMilestone".to_string(),
                key: "reportsPerMilestone".to_string(),
                value: 0.0,
            });
        }

        Ok(())
    }

    pub fn industry_multiplier(&self, industry: &Industry) -> f64 {
        lookup_multiplier(&self.industry_multipliers, industry)
    }

    pub fn infrastructure_multiplier(&self, infrastructure: &DataInfrastructure) -> f64 {
        lookup_multiplier(&self.infrastructure_multipliers, infrastructure)
    }

    pub fn timeline_multiplier(&self, timeline: &Timeline) -> f64 {
        lookup_multiplier(&self.timeline_multipliers, timeline)
    }

    pub fn it_team_multiplier(&self, it_team: &ItTeamCapacity) -> f64 {
        lookup_multiplier(&self.it_team_multipliers, it_team)
    }

    pub fn data_volume_surcharge(&self, volume: &DataVolume) -> f64 {
        self.data_volume_surcharges
            .get(volume)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn deployment_surcharge(&self, model: &DeploymentModel) -> f64 {
        self.deployment_surcharges
            .get(model)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn base_weeks(&self, timeline: &Timeline) -> u32 {
        self.timeline_base_weeks
            .get(timeline)
            .copied()
            .unwrap_or(self.schedule.default_base_weeks)
    }

    /// Monthly per-user price, `None` for plans billed elsewhere (e.g. free).
    pub fn license_rate(&self, license: &LicenseType) -> Option<f64> {
        self.rates.license_monthly_per_user.get(license).copied()
    }
}

impl Default for RulesTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn lookup_multiplier<K: Ord>(table: &BTreeMap<K, f64>, key: &K) -> f64 {
    table.get(key).copied().unwrap_or(NEUTRAL_MULTIPLIER)
}

fn check_values<K: std::fmt::Display>(
    field: &str,
    table: &BTreeMap<K, f64>,
) -> Result<(), RulesError> {
    for (key, value) in table {
        check_value(field, &key.to_string(), *value)?;
    }
    Ok(())
}

fn check_value(field: &str, key: &str, value: f64) -> Result<(), RulesError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RulesError::InvalidValue {
            field: field.to_string(),
            key: key.to_string(),
            value,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("unable to read rules table: {0}")]
    Io(#[from] std::io::Error),
    #[error("rules table is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("rules table entry {field}[{key}] = {value} must be finite and non-negative")]
    InvalidValue {
        field: String,
        key: String,
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn absent_options_fall_back_to_neutral_values() {
        let rules = RulesTable::standard();
        assert_eq!(
            rules.industry_multiplier(&Industry::Other("aerospace".to_string())),
            1.0
        );
        assert_eq!(rules.data_volume_surcharge(&DataVolume::Small), 0.0);
        assert_eq!(rules.data_volume_surcharge(&DataVolume::Medium), 0.0);
        assert_eq!(
            rules.deployment_surcharge(&DeploymentModel::Other(String::new())),
            0.0
        );
        assert_eq!(rules.base_weeks(&Timeline::Other("flexible".to_string())), 12);
        assert_eq!(
            rules.license_rate(&LicenseType::Other("free".to_string())),
            None
        );
    }

    #[test]
    fn standard_table_survives_json_round_trip() {
        let rules = RulesTable::standard();
        let encoded = serde_json::to_vec(&rules).expect("rules serialize");
        let decoded = RulesTable::from_reader(Cursor::new(encoded)).expect("rules parse");
        assert_eq!(decoded, rules);
    }

    #[test]
    fn encoded_tables_are_keyed_by_option_code() {
        let value = serde_json::to_value(RulesTable::standard()).expect("rules serialize");
        assert_eq!(value["itTeamMultipliers"]["none"], serde_json::json!(1.4));
        assert_eq!(value["timelineBaseWeeks"]["12-months+"], serde_json::json!(30));
        assert_eq!(
            value["rates"]["licenseMonthlyPerUser"]["premium_per_user"],
            serde_json::json!(20.0)
        );
    }

    #[test]
    fn negative_multipliers_are_rejected() {
        let mut rules = RulesTable::standard();
        rules.industry_multipliers.insert(Industry::Finance, -1.5);
        match rules.validate() {
            Err(RulesError::InvalidValue { field, key, .. }) => {
                assert_eq!(field, "industryMultipliers");
                assert_eq!(key, "finance");
            }
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn zero_milestone_size_is_rejected() {
        let mut rules = RulesTable::standard();
        rules.schedule.reports_per_milestone = 0;
        assert!(matches!(
            rules.validate(),
            Err(RulesError::InvalidValue { .. })
        ));
    }
}
