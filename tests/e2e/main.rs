// End-to-end tests for the narration pipeline
//
// These tests wire the real pipeline service, synthesis driver and artifact
// retriever to in-memory fakes of the synthesis service, the blob store and
// the document reader. Time is simulated with a manual clock so polling and
// settle delays cost nothing.

mod test_pipeline;
