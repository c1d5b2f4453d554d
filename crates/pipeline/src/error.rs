use thiserror::Error;

/// Stages of one invocation, in execution order. Normalization is pure and
/// cannot fail; its stage exists so failure reports name a consistent set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ReadImage,
    QueryLabels,
    QueryWebEntities,
    Normalize,
    Persist,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::ReadImage => "ReadImage",
            Stage::QueryLabels => "QueryLabels",
            Stage::QueryWebEntities => "QueryWebEntities",
            Stage::Normalize => "Normalize",
            Stage::Persist => "Persist",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum StageCause {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Annotation(#[from] annotate::AnnotationError),
    #[error(transparent)]
    Warehouse(#[from] warehouse::WarehouseError),
}

/// Terminal failure of an invocation: the stage that failed plus the
/// underlying cause. There is no resumption from a partial stage.
#[derive(Debug, Error)]
#[error("pipeline failed at {stage}: {cause}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub cause: StageCause,
}

impl PipelineError {
    pub fn at(stage: Stage, cause: impl Into<StageCause>) -> Self {
        Self {
            stage,
            cause: cause.into(),
        }
    }
}
