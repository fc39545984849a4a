//! Catalog of the results each model variant produces.

use std::path::Path;

use le_core::{PhaseWindow, ReachId};
use le_project::ModelKind;

use crate::fragment::{FragmentLayout, FragmentSource};
use crate::reassemble::{reassemble_daily, reassemble_daily_by_reach, reassemble_yearly_by_reach};
use crate::types::ResultArray;
use crate::ResultsResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// `[day, factor, run]`
    Daily,
    /// `[day, reach, factor, run]`
    DailyByReach,
    /// `[year, reach, factor]`
    YearlyByReach,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultKind {
    pub name: &'static str,
    /// File name stem (scenario fragments) or full file name (yearly fragments).
    pub fragment: &'static str,
    pub aggregation: Aggregation,
}

const fn kind(name: &'static str, fragment: &'static str, aggregation: Aggregation) -> ResultKind {
    ResultKind {
        name,
        fragment,
        aggregation,
    }
}

impl ResultKind {
    pub const POPULATION: [ResultKind; 9] = [
        kind("AdultMetaPopulation", "adultMetapop", Aggregation::Daily),
        kind("EmbryoMetaPopulation", "embryoMetapop", Aggregation::Daily),
        kind("ExtentLocalPopulationsMetaPopulation", "extantLocalPopsMetapop", Aggregation::Daily),
        kind("JuvenileAndAdultMetaPopulation", "juvAndAdultMetapop", Aggregation::Daily),
        kind("JuvenileMetaPopulation", "juvenileMetapop", Aggregation::Daily),
        kind("AdultPopulationByReach", "adultPopByReach", Aggregation::DailyByReach),
        kind("EmbryoPopulationByReach", "embryoPopByReach", Aggregation::DailyByReach),
        kind("JuvenileAndAdultPopulationByReach", "juvAndAdultPopByReach", Aggregation::DailyByReach),
        kind("JuvenilePopulationByReach", "juvenilePopByReach", Aggregation::DailyByReach),
    ];

    pub const INDIVIDUAL: [ResultKind; 1] = [kind(
        "GutsSurvivalReaches",
        "guts_survival_reaches.txt_mfactors.txt",
        Aggregation::YearlyByReach,
    )];

    pub fn for_model(model: ModelKind) -> &'static [ResultKind] {
        if model.is_population() {
            &Self::POPULATION
        } else {
            &Self::INDIVIDUAL
        }
    }

    /// Where the simulator writes this result under `processing_path`.
    pub fn layout(&self, processing_path: &Path, model: ModelKind) -> FragmentLayout {
        let ecotalk = processing_path.join("ecotalk");
        let output_name = format!("{}_MoS", model.model_system());
        match self.aggregation {
            Aggregation::Daily | Aggregation::DailyByReach => FragmentLayout::Scenario {
                output_dir: ecotalk.join(output_name),
                stem: self.fragment.to_string(),
            },
            Aggregation::YearlyByReach => FragmentLayout::Yearly {
                ecotalk_dir: ecotalk,
                output_name,
                file_name: self.fragment.to_string(),
            },
        }
    }

    /// Fold all fragments of this result into a complete array.
    ///
    /// `runs` is ignored for yearly results.
    pub fn reassemble(
        &self,
        source: &dyn FragmentSource,
        window: &PhaseWindow,
        reaches: &[ReachId],
        factors: usize,
        runs: usize,
    ) -> ResultsResult<ResultArray> {
        match self.aggregation {
            Aggregation::Daily => reassemble_daily(source, self.name, window, factors, runs),
            Aggregation::DailyByReach => {
                reassemble_daily_by_reach(source, self.name, window, reaches, factors, runs)
            }
            Aggregation::YearlyByReach => {
                reassemble_yearly_by_reach(source, self.name, window, reaches, factors)
            }
        }
    }
}
