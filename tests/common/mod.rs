//! Frame builder shared by the integration tests

#![allow(dead_code)]

use tarang_io::devices::mmwave::constants::{HEADER_SIZE, MAGIC_WORD};

/// Assembles a mmWave demo frame byte by byte
pub struct FrameBuilder {
    frame_number: u32,
    sub_frame: u32,
    num_detected_obj: u32,
    num_tlv: Option<u32>,
    total_len: Option<u32>,
    tlvs: Vec<(u32, Vec<u8>)>,
}

impl FrameBuilder {
    pub fn new(num_detected_obj: u32) -> Self {
        Self {
            frame_number: 1,
            sub_frame: 0,
            num_detected_obj,
            num_tlv: None,
            total_len: None,
            tlvs: Vec::new(),
        }
    }

    pub fn frame_number(mut self, n: u32) -> Self {
        self.frame_number = n;
        self
    }

    pub fn sub_frame(mut self, n: u32) -> Self {
        self.sub_frame = n;
        self
    }

    /// Override the header's TLV count
    pub fn num_tlv(mut self, n: u32) -> Self {
        self.num_tlv = Some(n);
        self
    }

    /// Override the header's total length
    pub fn total_len(mut self, n: u32) -> Self {
        self.total_len = Some(n);
        self
    }

    pub fn points(self, points: &[[f32; 4]]) -> Self {
        let payload = points
            .iter()
            .flat_map(|p| p.iter().flat_map(|f| f.to_le_bytes()))
            .collect();
        self.tlv(1, payload)
    }

    pub fn side_info(self, entries: &[(u16, u16)]) -> Self {
        let payload = entries
            .iter()
            .flat_map(|&(snr, noise)| {
                let mut rec = snr.to_le_bytes().to_vec();
                rec.extend_from_slice(&noise.to_le_bytes());
                rec
            })
            .collect();
        self.tlv(7, payload)
    }

    pub fn tlv(mut self, tlv_type: u32, payload: Vec<u8>) -> Self {
        self.tlvs.push((tlv_type, payload));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let body_len: usize = self.tlvs.iter().map(|(_, p)| 8 + p.len()).sum();
        let total_len = self
            .total_len
            .unwrap_or((HEADER_SIZE + body_len) as u32);

        let mut out = MAGIC_WORD.to_vec();
        for word in [
            0x0306_0002,
            total_len,
            0x000A_1843,
            self.frame_number,
            987_654,
            self.num_detected_obj,
            self.num_tlv.unwrap_or(self.tlvs.len() as u32),
            self.sub_frame,
        ] {
            out.extend_from_slice(&word.to_le_bytes());
        }
        for (tlv_type, payload) in &self.tlvs {
            out.extend_from_slice(&tlv_type.to_le_bytes());
            out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            out.extend_from_slice(payload);
        }
        out
    }
}

/// Two points with side info, the reference frame used across tests
pub const TWO_POINTS: [[f32; 4]; 2] = [[0.5, 2.0, 0.25, -1.25], [-1.0, 3.5, -0.5, 0.75]];
pub const TWO_SIDE_INFO: [(u16, u16); 2] = [(250, 80), (123, 45)];

pub fn two_point_frame() -> Vec<u8> {
    FrameBuilder::new(2)
        .points(&TWO_POINTS)
        .side_info(&TWO_SIDE_INFO)
        .build()
}
