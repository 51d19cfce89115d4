/// Use cases module containing application business logic orchestration
mod analyze_document;

pub use analyze_document::AnalyzeDocumentUseCase;
