#![allow(dead_code)]

use serde_json::{Value, json};

pub const API_KEY: &str = "sk-test";

pub fn document(id: &str, num_chunks: u64) -> Value {
    let chunks: Vec<Value> = (0..num_chunks)
        .map(|index| {
            json!({
                "id": format!("chunk_{index}"),
                "content": format!("segment {index}"),
                "chunk_index": index,
                "num_tokens": 12,
                "metadata": {}
            })
        })
        .collect();
    json!({
        "id": id,
        "content": "Large Language Models",
        "source": "https://arxiv.org/pdf/2408.15291",
        "source_type": "application/pdf",
        "num_chunks": num_chunks,
        "metadata": {},
        "chunks": chunks
    })
}

pub fn extract_body(status: &str) -> Value {
    json!({
        "status": status,
        "usage": { "pages": 3, "seconds": 2 },
        "message": null,
        "processing_options": { "chunk": true, "quality": "low" },
        "document": document("doc_1", if status == "completed" { 2 } else { 0 })
    })
}

pub fn chunk_body(num_chunks: u64) -> Value {
    json!({
        "status": "completed",
        "usage": { "tokens": 4212 },
        "message": null,
        "processing_options": {
            "max_chunk_length": 500,
            "chunker_type": "regex",
            "window_size": 1,
            "delimiters": ["\n\n"]
        },
        "document": document("doc_chunk", num_chunks)
    })
}

pub fn embedding_body() -> Value {
    json!({
        "message": null,
        "model": "bm25",
        "object": "list",
        "usage": { "prompt_tokens": 4, "total_tokens": 4 },
        "data": [{
            "object": "embedding",
            "index": 0,
            "embedding": { "indices": [17, 402], "values": [0.41, 0.73] }
        }]
    })
}
