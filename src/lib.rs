pub mod error;
pub mod io;
pub mod models;
pub mod stages;

pub use error::{AnnotationError, PipelineError, PipelineWarning, TurnGroupViolation};
pub use io::{
    GraphDocument, GraphSummary, InputFormat, parse_transcript_file, parse_transcript_json,
    parse_transcript_tsv,
};
pub use models::{
    AnnotationConfig, Edge, Graph, Node, NodeId, PipelineReport, RawAnnotation, TranscriptRow,
    TranscriptStore, Turn, TurnId,
};
pub use stages::{
    PipelineConfig, PipelineOutput, ResolveConfig, aggregate_links, assemble_graph, build_store,
    expand_annotations, resolve_references, run_pipeline,
};
