pub mod preprocess; // Normalization, cleaning, sentences, sections
pub mod extraction; // PDF text layer and image OCR
pub mod inference; // Hugging Face and Ollama clients
pub mod summarization; // Chunked and per-section summaries
pub mod diagnosis; // Ranked candidate diagnoses
