//! OpenAPI specification for LintLens server.

use utoipa::OpenApi;

use lintlens_core::aggregate::IssueEntry;
use lintlens_core::descriptions::{BandReading, ComplexityReading, IssueDescription};
use lintlens_core::heatmap::{HeatmapCell, HeatmapGrid, Palette};
use lintlens_core::report::{CorrelatedFile, CorrelatedLine, CorrelationReport};
use lintlens_core::runs::{CombinedRun, IndividualRun, RunHistory};
use lintlens_core::statistics::{CategoryStatistics, StatisticRow};
use lintlens_core::stored::{CategoryView, IssueLine, RawSourceView, SourceLine, StoredView};
use lintlens_core::trend::{HeatmapSnapshot, SnapshotRow, TrendPoint, TrendReport, TrendSeries};
use lintlens_core::{Category, RepositoryInfo};

use crate::routes::{DashboardSnapshot, ErrorResponse, HeatmapResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::correlation,
        crate::routes::statistics,
        crate::routes::heatmap,
        crate::routes::trend,
        crate::routes::runs,
        crate::routes::stored_result,
        crate::routes::raw_source,
        crate::routes::description,
        crate::routes::complexity,
        crate::routes::dashboard_snapshot,
        crate::routes::openapi_json
    ),
    components(
        schemas(
            Category,
            RepositoryInfo,
            IssueEntry,
            CorrelatedLine,
            CorrelatedFile,
            CorrelationReport,
            HeatmapCell,
            HeatmapGrid,
            Palette,
            HeatmapSnapshot,
            SnapshotRow,
            HeatmapResponse,
            StatisticRow,
            CategoryStatistics,
            TrendPoint,
            TrendSeries,
            TrendReport,
            CombinedRun,
            IndividualRun,
            RunHistory,
            IssueLine,
            CategoryView,
            StoredView,
            SourceLine,
            RawSourceView,
            BandReading,
            ComplexityReading,
            IssueDescription,
            DashboardSnapshot,
            ErrorResponse
        )
    ),
    tags(
        (name = "analysis", description = "Views computed across every result"),
        (name = "results", description = "Stored analyses"),
        (name = "descriptions", description = "Issue and complexity descriptions"),
        (name = "dashboard", description = "Dashboard snapshot"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI specification for the LintLens server.
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn openapi_includes_expected_paths() {
        let doc = ApiDoc::openapi();
        let paths = doc.paths.paths;

        assert!(paths.contains_key("/correlation"));
        assert!(paths.contains_key("/statistics"));
        assert!(paths.contains_key("/heatmap"));
        assert!(paths.contains_key("/trend"));
        assert!(paths.contains_key("/runs"));
        assert!(paths.contains_key("/results/{id}"));
        assert!(paths.contains_key("/raw/{id}"));
        assert!(paths.contains_key("/descriptions/{category}/{key}"));
        assert!(paths.contains_key("/complexity/{score}"));
        assert!(paths.contains_key("/dashboard/snapshot"));
        assert!(paths.contains_key("/openapi.json"));
    }
}
