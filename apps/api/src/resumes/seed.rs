use anyhow::Result;
use bytes::Bytes;
use tracing::info;

use crate::resumes::blobs::BlobStore;
use crate::resumes::store::{NewResume, ResumeStore};

/// A bootstrap résumé inserted into an empty store.
#[derive(Debug, Clone, Copy)]
pub struct SampleResume {
    pub filename: &'static str,
    pub path: &'static str,
    pub text: &'static str,
}

pub const SAMPLE_RESUMES: &[SampleResume] = &[
    SampleResume {
        filename: "rahul_sharma.pdf",
        path: "samples/rahul_sharma.txt",
        text: "Rahul Sharma\nEmail: rahul.sharma@example.com\nSkills: Python, Java, C++, HTML, CSS, JavaScript, React, MySQL, Machine Learning, Data Analysis\nProjects: Online Bookstore (MERN), Fake News Detection (ML)",
    },
    SampleResume {
        filename: "anita_verma.pdf",
        path: "samples/anita_verma.txt",
        text: "Anita Verma\nEmail: anita.verma@example.com\nSkills: Python, Flask, SQL, AWS, Docker, NLP, TensorFlow\nProjects: Chatbot with NLP, Sentiment Analysis",
    },
    SampleResume {
        filename: "vikram_patel.pdf",
        path: "samples/vikram_patel.txt",
        text: "Vikram Patel\nEmail: vikram.patel@example.com\nSkills: Java, Spring Boot, MySQL, Kubernetes, Linux\nProjects: E-commerce Backend, Order Management System",
    },
];

/// Inserts the sample résumés when the store is empty. Returns how many were
/// inserted (0 when the store already had rows).
pub async fn seed_samples(store: &dyn ResumeStore, blobs: &dyn BlobStore) -> Result<usize> {
    if store.count().await? > 0 {
        return Ok(0);
    }

    for sample in SAMPLE_RESUMES {
        blobs
            .put(sample.path, Bytes::from_static(sample.text.as_bytes()), "text/plain")
            .await?;
        store
            .insert(NewResume {
                filename: sample.filename.to_string(),
                filepath: sample.path.to_string(),
                text: sample.text.to_string(),
            })
            .await?;
    }

    info!("Seeded {} sample resumes", SAMPLE_RESUMES.len());
    Ok(SAMPLE_RESUMES.len())
}
