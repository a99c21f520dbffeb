/// Surface texture, its view and the encoder every pass of one redraw records into.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl GpuFrame {
    /// Submits the recorded passes on `queue` and presents the texture.
    ///
    /// The view is released before presenting.
    pub(crate) fn present(self, queue: &wgpu::Queue) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = self;
        queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }
}
